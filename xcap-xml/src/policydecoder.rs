use chrono::DateTime;

use super::error::ParsingError;
use super::policytypes::*;
use super::xml::{IRead, QRead, Reader, CP_URN, PR_URN};

impl QRead<Ruleset> for Ruleset {
    fn qread(xml: &mut Reader<impl IRead>) -> Result<Self, ParsingError> {
        xml.open(CP_URN, "ruleset")?;
        let rules = xml.collect::<Rule>()?;
        xml.close()?;
        Ok(Ruleset(rules))
    }
}

impl QRead<Rule> for Rule {
    fn qread(xml: &mut Reader<impl IRead>) -> Result<Self, ParsingError> {
        xml.open(CP_URN, "rule")?;
        let id = xml.prev_attr("id").ok_or(ParsingError::MissingAttribute)?;
        let (mut conditions, mut actions, mut transformations) = (None, None, None);
        loop {
            let mut dirty = false;
            xml.maybe_read::<Conditions>(&mut conditions, &mut dirty)?;
            xml.maybe_read::<Actions>(&mut actions, &mut dirty)?;
            xml.maybe_read::<Transformations>(&mut transformations, &mut dirty)?;
            if !dirty && !xml.skip_unknown()? {
                break;
            }
        }
        xml.close()?;

        Ok(Rule {
            id,
            conditions: conditions.unwrap_or_default(),
            actions: actions.unwrap_or_default(),
            transformations: transformations.unwrap_or_default(),
        })
    }
}

impl QRead<Conditions> for Conditions {
    fn qread(xml: &mut Reader<impl IRead>) -> Result<Self, ParsingError> {
        xml.open(CP_URN, "conditions")?;
        let mut conditions = Conditions::default();
        loop {
            let mut dirty = false;
            xml.maybe_read::<Identity>(&mut conditions.identity, &mut dirty)?;
            xml.maybe_read::<Sphere>(&mut conditions.sphere, &mut dirty)?;
            xml.maybe_read::<Validity>(&mut conditions.validity, &mut dirty)?;
            if !dirty && !xml.skip_unknown()? {
                break;
            }
        }
        xml.close()?;
        Ok(conditions)
    }
}

impl QRead<Identity> for Identity {
    fn qread(xml: &mut Reader<impl IRead>) -> Result<Self, ParsingError> {
        xml.open(CP_URN, "identity")?;
        let mut identity = Identity::default();
        loop {
            let mut dirty = false;
            xml.maybe_push::<One>(&mut identity.one, &mut dirty)?;
            xml.maybe_push::<Many>(&mut identity.many, &mut dirty)?;
            if !dirty && !xml.skip_unknown()? {
                break;
            }
        }
        xml.close()?;
        Ok(identity)
    }
}

impl QRead<One> for One {
    fn qread(xml: &mut Reader<impl IRead>) -> Result<Self, ParsingError> {
        xml.open(CP_URN, "one")?;
        let id = xml.prev_attr("id").ok_or(ParsingError::MissingAttribute)?;
        xml.close()?;
        Ok(One { id })
    }
}

impl QRead<Many> for Many {
    fn qread(xml: &mut Reader<impl IRead>) -> Result<Self, ParsingError> {
        xml.open(CP_URN, "many")?;
        let domain = xml.prev_attr("domain");
        let except = xml.collect::<Except>()?;
        xml.close()?;
        Ok(Many { domain, except })
    }
}

impl QRead<Except> for Except {
    fn qread(xml: &mut Reader<impl IRead>) -> Result<Self, ParsingError> {
        xml.open(CP_URN, "except")?;
        let except = match (xml.prev_attr("id"), xml.prev_attr("domain")) {
            (Some(id), _) => Except::Id(id),
            (None, Some(domain)) => Except::Domain(domain),
            (None, None) => return Err(ParsingError::MissingAttribute),
        };
        xml.close()?;
        Ok(except)
    }
}

impl QRead<Sphere> for Sphere {
    fn qread(xml: &mut Reader<impl IRead>) -> Result<Self, ParsingError> {
        xml.open(CP_URN, "sphere")?;
        let value = xml.prev_attr("value").ok_or(ParsingError::MissingAttribute)?;
        xml.close()?;
        Ok(Sphere { value })
    }
}

impl QRead<Validity> for Validity {
    fn qread(xml: &mut Reader<impl IRead>) -> Result<Self, ParsingError> {
        xml.open(CP_URN, "validity")?;
        let mut periods = Vec::new();
        let mut from = None;
        loop {
            if xml.maybe_open(CP_URN, "from")?.is_some() {
                from = Some(DateTime::parse_from_rfc3339(xml.tag_string()?.trim())?);
                xml.close()?;
                continue;
            }
            if xml.maybe_open(CP_URN, "until")?.is_some() {
                let until = DateTime::parse_from_rfc3339(xml.tag_string()?.trim())?;
                xml.close()?;
                // <until> always follows its <from>
                let from = from.take().ok_or(ParsingError::MissingChild)?;
                periods.push(Period { from, until });
                continue;
            }
            if !xml.skip_unknown()? {
                break;
            }
        }
        xml.close()?;

        match from {
            Some(_) => Err(ParsingError::MissingChild),
            None => Ok(Validity(periods)),
        }
    }
}

impl QRead<Actions> for Actions {
    fn qread(xml: &mut Reader<impl IRead>) -> Result<Self, ParsingError> {
        xml.open(CP_URN, "actions")?;
        let mut sub_handling = None;
        loop {
            let mut dirty = false;
            xml.maybe_read::<SubHandling>(&mut sub_handling, &mut dirty)?;
            if !dirty && !xml.skip_unknown()? {
                break;
            }
        }
        xml.close()?;
        Ok(Actions { sub_handling })
    }
}

impl QRead<SubHandling> for SubHandling {
    fn qread(xml: &mut Reader<impl IRead>) -> Result<Self, ParsingError> {
        xml.open(PR_URN, "sub-handling")?;
        let value = xml.tag_string()?;
        xml.close()?;
        SubHandling::parse(value.trim()).ok_or(ParsingError::InvalidValue)
    }
}

impl QRead<Transformations> for Transformations {
    fn qread(xml: &mut Reader<impl IRead>) -> Result<Self, ParsingError> {
        xml.open(CP_URN, "transformations")?;
        let mut transformations = Transformations::default();
        loop {
            if xml.maybe_open(PR_URN, "provide-services")?.is_some() {
                transformations.provide_services = Some(read_provision(xml, "all-services")?);
                continue;
            }
            if xml.maybe_open(PR_URN, "provide-persons")?.is_some() {
                transformations.provide_persons = Some(read_provision(xml, "all-persons")?);
                continue;
            }
            if xml.maybe_open(PR_URN, "provide-devices")?.is_some() {
                transformations.provide_devices = Some(read_provision(xml, "all-devices")?);
                continue;
            }
            if xml.maybe_open(PR_URN, "provide-all-attributes")?.is_some() {
                transformations.provide_all_attributes = true;
                xml.close()?;
                continue;
            }
            if !xml.skip_unknown()? {
                break;
            }
        }
        xml.close()?;
        Ok(transformations)
    }
}

/// Read the content of an opened provide-* element, and close it
fn read_provision(xml: &mut Reader<impl IRead>, all_name: &str) -> Result<Provision, ParsingError> {
    let (mut all, mut classes) = (false, Vec::new());
    loop {
        if xml.maybe_open(PR_URN, all_name)?.is_some() {
            all = true;
            xml.close()?;
            continue;
        }
        if xml.maybe_open(PR_URN, "class")?.is_some() {
            classes.push(xml.tag_string()?.trim().to_string());
            xml.close()?;
            continue;
        }
        if !xml.skip_unknown()? {
            break;
        }
    }
    xml.close()?;

    match all {
        true => Ok(Provision::All),
        false => Ok(Provision::Classes(classes)),
    }
}
