use anyhow::{bail, Context, Result};

use xcap_client::{
    HttpXCapClient, PresContentClient, PresRulesClient, ResourceListsClient, XCapClient,
    XCapHttpResponse, XCapResource, XCapResourceId,
};
use xcap_xml::policytypes::{Rule, SubHandling};
use xcap_xml::rltypes::{DisplayName, Entry, List, ListItem};

use crate::{Command, PresContentCommand, PresRulesCommand, ResourceListsCommand};

pub async fn run(client: &mut XCapClient, command: &Command) -> Result<()> {
    match command {
        Command::Caps => caps(client),
        Command::Get { document, node } => {
            let id = resource_id(document, node)?;
            let res = client.get(&id).await?;
            print_response(client, &res)
        }
        Command::Put {
            document,
            node,
            content_type,
            file,
            if_match,
        } => {
            let content = std::fs::read_to_string(file)
                .with_context(|| format!("unable to read {}", file.display()))?;
            let mut resource = XCapResource::new(resource_id(document, node)?, content, content_type);
            if let Some(etag) = if_match {
                resource = resource.with_if_match(etag);
            }
            let res = client.put(&resource).await?;
            print_response(client, &res)
        }
        Command::Delete { document, node } => {
            let id = resource_id(document, node)?;
            let res = client.delete(&id).await?;
            print_response(client, &res)
        }
        Command::ResourceLists(cmd) => resource_lists(client, cmd).await,
        Command::PresRules(cmd) => pres_rules(client, cmd).await,
        Command::PresContent(cmd) => pres_content(client, cmd).await,
    }
}

fn resource_id(document: &str, node: &Option<String>) -> Result<XCapResourceId> {
    Ok(match node {
        Some(node) => XCapResourceId::with_node(document, node.as_str())?,
        None => XCapResourceId::parse(document)?,
    })
}

fn print_response(client: &XCapClient, res: &XCapHttpResponse) -> Result<()> {
    eprintln!("HTTP {}", res.http_code());
    if let Some(etag) = res.etag() {
        eprintln!("ETag: {}", etag);
    }
    if let Some(message) = client.get_xcap_error_message(res) {
        bail!("conflict: {}", message);
    }
    if !(200..300).contains(&res.http_code()) {
        bail!("the XCAP server answered {}", res.http_code());
    }
    if let Some(content) = res.content() {
        println!("{}", String::from_utf8_lossy(content));
    }
    Ok(())
}

fn caps(client: &XCapClient) -> Result<()> {
    let caps = client.caps().context("capabilities not loaded")?;
    println!("auids:");
    for auid in caps.auids.iter() {
        println!("  {}", auid.0);
    }
    println!("extensions:");
    for extension in caps.extensions.iter() {
        println!("  {}", extension.0);
    }
    println!("namespaces:");
    for namespace in caps.namespaces.iter() {
        println!("  {}", namespace.0);
    }
    Ok(())
}

async fn resource_lists(client: &mut XCapClient, cmd: &ResourceListsCommand) -> Result<()> {
    if !client.is_resource_lists_supported() {
        tracing::warn!("the server does not announce resource-lists");
    }
    let mut lists = client.get_resource_lists().await?;

    match cmd {
        ResourceListsCommand::Show => {
            for list in lists.0.iter() {
                print_list(list, 0);
            }
            return Ok(());
        }
        ResourceListsCommand::Add {
            uri,
            list,
            display_name,
        } => {
            let entry = Entry::new(uri.as_str(), display_name.as_deref());
            if !lists.list_or_create(list).add_entry(entry) {
                bail!("{} is already in {}", uri, list);
            }
        }
        ResourceListsCommand::Remove { uri } => {
            if lists.remove_entry(uri) == 0 {
                bail!("{} is in no list", uri);
            }
        }
    }

    client.put_resource_lists(&lists).await?;
    tracing::info!("resource lists updated");
    Ok(())
}

fn print_list(list: &List, depth: usize) {
    let indent = "  ".repeat(depth);
    println!(
        "{}{}{}",
        indent,
        list.name.as_deref().unwrap_or("(unnamed)"),
        display(&list.display_name)
    );
    for item in list.items.iter() {
        match item {
            ListItem::Entry(e) => println!("{}  {}{}", indent, e.uri, display(&e.display_name)),
            ListItem::EntryRef(r) => {
                println!("{}  ref {}{}", indent, r.reference, display(&r.display_name))
            }
            ListItem::External(x) => {
                println!("{}  external {}{}", indent, x.anchor, display(&x.display_name))
            }
            ListItem::List(l) => print_list(l, depth + 1),
        }
    }
}

fn display(name: &Option<DisplayName>) -> String {
    match name {
        Some(n) => format!(" ({})", n.value),
        None => String::new(),
    }
}

async fn pres_rules(client: &mut XCapClient, cmd: &PresRulesCommand) -> Result<()> {
    if !client.is_pres_rules_supported() {
        tracing::warn!("the server does not announce pres-rules");
    }
    let mut ruleset = client.get_pres_rules().await?;

    match cmd {
        PresRulesCommand::Show => {
            for rule in ruleset.0.iter() {
                print_rule(rule);
            }
            return Ok(());
        }
        PresRulesCommand::Allow { uri } => ruleset.set_handling(uri, SubHandling::Allow),
        PresRulesCommand::Block { uri } => ruleset.set_handling(uri, SubHandling::Block),
        PresRulesCommand::PoliteBlock { uri } => {
            ruleset.set_handling(uri, SubHandling::PoliteBlock)
        }
        PresRulesCommand::Forget { uri } => {
            if !ruleset.forget(uri) {
                bail!("{} is in no rule", uri);
            }
        }
    }

    client.put_pres_rules(&ruleset).await?;
    tracing::info!("presence rules updated");
    Ok(())
}

fn print_rule(rule: &Rule) {
    let handling = rule
        .actions
        .sub_handling
        .as_ref()
        .map_or("-", SubHandling::as_str);
    println!("{} [{}]", rule.id, handling);
    if let Some(identity) = &rule.conditions.identity {
        for one in identity.one.iter() {
            println!("  {}", one.id);
        }
        for many in identity.many.iter() {
            println!("  *@{}", many.domain.as_deref().unwrap_or("*"));
        }
    }
}

async fn pres_content(client: &mut XCapClient, cmd: &PresContentCommand) -> Result<()> {
    match cmd {
        PresContentCommand::Show { name } => {
            let content = client
                .get_pres_content(name)
                .await?
                .with_context(|| format!("no {} document", name))?;
            let data = content.decode_data()?;
            println!("mime-type: {}", content.mime_type.as_deref().unwrap_or("-"));
            if let Some(description) = &content.description {
                println!("description: {}", description);
            }
            println!("size: {} bytes", data.len());
        }
        PresContentCommand::FetchImage { uri, output } => {
            let image = client.get_image(uri).await?;
            std::fs::write(output, &image)
                .with_context(|| format!("unable to write {}", output.display()))?;
            println!("{} bytes written to {}", image.len(), output.display());
        }
    }
    Ok(())
}
