use quick_xml::events::Event;
use quick_xml::Error as QError;

use super::policytypes::*;
use super::xml::{IWrite, QWrite, Writer};

impl QWrite for Ruleset {
    fn qwrite(&self, xml: &mut Writer<impl IWrite>) -> Result<(), QError> {
        let start = xml.create_cp_element("ruleset");
        if self.0.is_empty() {
            return xml.q.write_event(Event::Empty(start));
        }

        let end = start.to_end();
        xml.q.write_event(Event::Start(start.clone()))?;
        for rule in self.0.iter() {
            rule.qwrite(xml)?;
        }
        xml.q.write_event(Event::End(end))
    }
}

impl QWrite for Rule {
    fn qwrite(&self, xml: &mut Writer<impl IWrite>) -> Result<(), QError> {
        let mut start = xml.create_cp_element("rule");
        start.push_attribute(("id", self.id.as_str()));
        let end = start.to_end();

        xml.q.write_event(Event::Start(start.clone()))?;
        if !self.conditions.is_empty() {
            self.conditions.qwrite(xml)?;
        }
        if self.actions.sub_handling.is_some() {
            self.actions.qwrite(xml)?;
        }
        if !self.transformations.is_empty() {
            self.transformations.qwrite(xml)?;
        }
        xml.q.write_event(Event::End(end))
    }
}

impl QWrite for Conditions {
    fn qwrite(&self, xml: &mut Writer<impl IWrite>) -> Result<(), QError> {
        let start = xml.create_cp_element("conditions");
        let end = start.to_end();

        xml.q.write_event(Event::Start(start.clone()))?;
        if let Some(identity) = &self.identity {
            identity.qwrite(xml)?;
        }
        if let Some(sphere) = &self.sphere {
            sphere.qwrite(xml)?;
        }
        if let Some(validity) = &self.validity {
            validity.qwrite(xml)?;
        }
        xml.q.write_event(Event::End(end))
    }
}

impl QWrite for Identity {
    fn qwrite(&self, xml: &mut Writer<impl IWrite>) -> Result<(), QError> {
        let start = xml.create_cp_element("identity");
        if self.is_empty() {
            return xml.q.write_event(Event::Empty(start));
        }

        let end = start.to_end();
        xml.q.write_event(Event::Start(start.clone()))?;
        for one in self.one.iter() {
            one.qwrite(xml)?;
        }
        for many in self.many.iter() {
            many.qwrite(xml)?;
        }
        xml.q.write_event(Event::End(end))
    }
}

impl QWrite for One {
    fn qwrite(&self, xml: &mut Writer<impl IWrite>) -> Result<(), QError> {
        let mut start = xml.create_cp_element("one");
        start.push_attribute(("id", self.id.as_str()));
        xml.q.write_event(Event::Empty(start))
    }
}

impl QWrite for Many {
    fn qwrite(&self, xml: &mut Writer<impl IWrite>) -> Result<(), QError> {
        let mut start = xml.create_cp_element("many");
        if let Some(domain) = &self.domain {
            start.push_attribute(("domain", domain.as_str()));
        }
        if self.except.is_empty() {
            return xml.q.write_event(Event::Empty(start));
        }

        let end = start.to_end();
        xml.q.write_event(Event::Start(start.clone()))?;
        for except in self.except.iter() {
            except.qwrite(xml)?;
        }
        xml.q.write_event(Event::End(end))
    }
}

impl QWrite for Except {
    fn qwrite(&self, xml: &mut Writer<impl IWrite>) -> Result<(), QError> {
        let mut start = xml.create_cp_element("except");
        match self {
            Self::Id(id) => start.push_attribute(("id", id.as_str())),
            Self::Domain(domain) => start.push_attribute(("domain", domain.as_str())),
        };
        xml.q.write_event(Event::Empty(start))
    }
}

impl QWrite for Sphere {
    fn qwrite(&self, xml: &mut Writer<impl IWrite>) -> Result<(), QError> {
        let mut start = xml.create_cp_element("sphere");
        start.push_attribute(("value", self.value.as_str()));
        xml.q.write_event(Event::Empty(start))
    }
}

impl QWrite for Validity {
    fn qwrite(&self, xml: &mut Writer<impl IWrite>) -> Result<(), QError> {
        let start = xml.create_cp_element("validity");
        let end = start.to_end();

        xml.q.write_event(Event::Start(start.clone()))?;
        for period in self.0.iter() {
            let from = xml.create_cp_element("from");
            xml.text_element(from, &period.from.to_rfc3339())?;
            let until = xml.create_cp_element("until");
            xml.text_element(until, &period.until.to_rfc3339())?;
        }
        xml.q.write_event(Event::End(end))
    }
}

impl QWrite for Actions {
    fn qwrite(&self, xml: &mut Writer<impl IWrite>) -> Result<(), QError> {
        let start = xml.create_cp_element("actions");
        let end = start.to_end();

        xml.q.write_event(Event::Start(start.clone()))?;
        if let Some(sub_handling) = &self.sub_handling {
            sub_handling.qwrite(xml)?;
        }
        xml.q.write_event(Event::End(end))
    }
}

impl QWrite for SubHandling {
    fn qwrite(&self, xml: &mut Writer<impl IWrite>) -> Result<(), QError> {
        let start = xml.create_pr_element("sub-handling");
        xml.text_element(start, self.as_str())
    }
}

impl QWrite for Transformations {
    fn qwrite(&self, xml: &mut Writer<impl IWrite>) -> Result<(), QError> {
        let start = xml.create_cp_element("transformations");
        let end = start.to_end();

        xml.q.write_event(Event::Start(start.clone()))?;
        if let Some(p) = &self.provide_services {
            write_provision(xml, "provide-services", "all-services", p)?;
        }
        if let Some(p) = &self.provide_persons {
            write_provision(xml, "provide-persons", "all-persons", p)?;
        }
        if let Some(p) = &self.provide_devices {
            write_provision(xml, "provide-devices", "all-devices", p)?;
        }
        if self.provide_all_attributes {
            let all = xml.create_pr_element("provide-all-attributes");
            xml.q.write_event(Event::Empty(all))?;
        }
        xml.q.write_event(Event::End(end))
    }
}

fn write_provision(
    xml: &mut Writer<impl IWrite>,
    name: &str,
    all_name: &str,
    provision: &Provision,
) -> Result<(), QError> {
    let start = xml.create_pr_element(name);
    let end = start.to_end();

    xml.q.write_event(Event::Start(start.clone()))?;
    match provision {
        Provision::All => {
            let all = xml.create_pr_element(all_name);
            xml.q.write_event(Event::Empty(all))?;
        }
        Provision::Classes(classes) => {
            for class in classes.iter() {
                let elem = xml.create_pr_element("class");
                xml.text_element(elem, class)?;
            }
        }
    }
    xml.q.write_event(Event::End(end))
}
