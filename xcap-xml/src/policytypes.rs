use chrono::{DateTime, FixedOffset};

use super::xml::{Document, CP_NS, PR_NS};

//RFC covered: RFC4745 (common policy), RFC5025 (presence authorization rules)

/// Rule id of the whitelist, subscriptions are accepted
pub const ALLOW_RULE_ID: &str = "presence_allow";
/// Rule id of the blacklist, subscriptions are rejected
pub const BLOCK_RULE_ID: &str = "presence_deny";
/// Rule id of the polite blacklist, subscriptions look accepted but get no data
pub const POLITE_BLOCK_RULE_ID: &str = "presence_polite_block";
/// Rule id for watchers that must be confirmed by the user
pub const CONFIRM_RULE_ID: &str = "presence_confirm";

/// 7.  Basic Data Model and Processing
///
/// A ruleset is an unordered set of rules. The permissions of the rules
/// whose conditions match a request are combined by the server.
///
/// <xs:element name="ruleset">
///   <xs:complexType>
///     <xs:sequence>
///       <xs:element name="rule" type="cp:ruleType" minOccurs="0" maxOccurs="unbounded"/>
///     </xs:sequence>
///   </xs:complexType>
/// </xs:element>
#[derive(Debug, PartialEq, Clone, Default)]
pub struct Ruleset(pub Vec<Rule>);
impl Document for Ruleset {
    const NAMESPACES: &'static [(&'static str, &'static str)] = &[("cp", CP_NS), ("pr", PR_NS)];
}
impl Ruleset {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn rule(&self, id: &str) -> Option<&Rule> {
        self.0.iter().find(|r| r.id == id)
    }

    /// The well known rule of this sub-handling, created when missing
    pub fn handling_rule_mut(&mut self, handling: SubHandling) -> &mut Rule {
        let id = handling.rule_id();
        let idx = match self.0.iter().position(|r| r.id == id) {
            Some(idx) => idx,
            None => {
                self.0.push(Rule::for_handling(handling));
                self.0.len() - 1
            }
        };
        &mut self.0[idx]
    }

    /// Sub-handling of the first rule naming `uri` in its identity
    pub fn handling_for(&self, uri: &str) -> Option<SubHandling> {
        self.0
            .iter()
            .find(|r| r.has_identity(uri))
            .and_then(|r| r.actions.sub_handling.clone())
    }

    /// Put `uri` in the well known rule of `handling`, and only there
    pub fn set_handling(&mut self, uri: &str, handling: SubHandling) {
        self.forget(uri);
        self.handling_rule_mut(handling).add_identity(uri);
    }

    /// Remove `uri` from every rule. A rule left with an empty identity
    /// would match everybody, so it is dropped.
    pub fn forget(&mut self, uri: &str) -> bool {
        let mut found = false;
        self.0.retain_mut(|rule| {
            if !rule.remove_identity(uri) {
                return true;
            }
            found = true;
            !rule.conditions.identity.as_ref().map_or(true, Identity::is_empty)
        });
        found
    }
}

/// <xs:complexType name="ruleType">
///   <xs:sequence>
///     <xs:element name="conditions" type="cp:conditionsType" minOccurs="0"/>
///     <xs:element name="actions" type="cp:extensibleType" minOccurs="0"/>
///     <xs:element name="transformations" type="cp:extensibleType" minOccurs="0"/>
///   </xs:sequence>
///   <xs:attribute name="id" type="xs:ID" use="required"/>
/// </xs:complexType>
#[derive(Debug, PartialEq, Clone, Default)]
pub struct Rule {
    pub id: String,
    pub conditions: Conditions,
    pub actions: Actions,
    pub transformations: Transformations,
}
impl Rule {
    /// An empty rule for this sub-handling. Allowed watchers see the full
    /// presence document, other handlings give no data.
    pub fn for_handling(handling: SubHandling) -> Self {
        let transformations = match handling {
            SubHandling::Allow => Transformations {
                provide_services: Some(Provision::All),
                provide_persons: Some(Provision::All),
                provide_devices: Some(Provision::All),
                provide_all_attributes: true,
            },
            _ => Transformations::default(),
        };
        Self {
            id: handling.rule_id().into(),
            conditions: Conditions {
                identity: Some(Identity::default()),
                ..Conditions::default()
            },
            actions: Actions {
                sub_handling: Some(handling),
            },
            transformations,
        }
    }

    pub fn has_identity(&self, uri: &str) -> bool {
        self.conditions
            .identity
            .as_ref()
            .map_or(false, |i| i.one.iter().any(|o| o.id == uri))
    }

    /// Returns false if `uri` was already there
    pub fn add_identity(&mut self, uri: &str) -> bool {
        if self.has_identity(uri) {
            return false;
        }
        self.conditions
            .identity
            .get_or_insert_with(Identity::default)
            .one
            .push(One { id: uri.into() });
        true
    }

    /// Returns false if `uri` was not there
    pub fn remove_identity(&mut self, uri: &str) -> bool {
        match self.conditions.identity.as_mut() {
            Some(identity) => {
                let before = identity.one.len();
                identity.one.retain(|o| o.id != uri);
                identity.one.len() != before
            }
            None => false,
        }
    }
}

/// All the conditions must be true for the rule to apply.
/// No condition at all means the rule always applies.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct Conditions {
    pub identity: Option<Identity>,
    pub sphere: Option<Sphere>,
    pub validity: Option<Validity>,
}
impl Conditions {
    pub fn is_empty(&self) -> bool {
        self.identity.is_none() && self.sphere.is_none() && self.validity.is_none()
    }
}

/// 7.1.  Identity Condition
#[derive(Debug, PartialEq, Clone, Default)]
pub struct Identity {
    pub one: Vec<One>,
    pub many: Vec<Many>,
}
impl Identity {
    pub fn is_empty(&self) -> bool {
        self.one.is_empty() && self.many.is_empty()
    }
}

/// A single authenticated identity, eg. `sip:alice@example.com`
#[derive(Debug, PartialEq, Clone)]
pub struct One {
    pub id: String,
}

/// Every identity of `domain`, or every authenticated identity when
/// there is no domain, minus the exceptions
#[derive(Debug, PartialEq, Clone, Default)]
pub struct Many {
    pub domain: Option<String>,
    pub except: Vec<Except>,
}

#[derive(Debug, PartialEq, Clone)]
pub enum Except {
    Id(String),
    Domain(String),
}

/// 7.2.  Sphere
#[derive(Debug, PartialEq, Clone)]
pub struct Sphere {
    pub value: String,
}

/// 7.3.  Validity
///
/// The rule applies during any of the periods
#[derive(Debug, PartialEq, Clone, Default)]
pub struct Validity(pub Vec<Period>);

#[derive(Debug, PartialEq, Clone)]
pub struct Period {
    pub from: DateTime<FixedOffset>,
    pub until: DateTime<FixedOffset>,
}

#[derive(Debug, PartialEq, Clone, Default)]
pub struct Actions {
    pub sub_handling: Option<SubHandling>,
}

/// RFC5025 3.2.1.  Subscription Handling
#[derive(Debug, PartialEq, Clone)]
pub enum SubHandling {
    Block,
    Confirm,
    PoliteBlock,
    Allow,
}
impl SubHandling {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Block => "block",
            Self::Confirm => "confirm",
            Self::PoliteBlock => "polite-block",
            Self::Allow => "allow",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "block" => Some(Self::Block),
            "confirm" => Some(Self::Confirm),
            "polite-block" => Some(Self::PoliteBlock),
            "allow" => Some(Self::Allow),
            _ => None,
        }
    }

    /// Id of the rule holding the watchers handled this way
    pub fn rule_id(&self) -> &'static str {
        match self {
            Self::Block => BLOCK_RULE_ID,
            Self::Confirm => CONFIRM_RULE_ID,
            Self::PoliteBlock => POLITE_BLOCK_RULE_ID,
            Self::Allow => ALLOW_RULE_ID,
        }
    }
}

/// RFC5025 3.3.  Transformations
#[derive(Debug, PartialEq, Clone, Default)]
pub struct Transformations {
    pub provide_services: Option<Provision>,
    pub provide_persons: Option<Provision>,
    pub provide_devices: Option<Provision>,
    pub provide_all_attributes: bool,
}
impl Transformations {
    pub fn is_empty(&self) -> bool {
        self.provide_services.is_none()
            && self.provide_persons.is_none()
            && self.provide_devices.is_none()
            && !self.provide_all_attributes
    }
}

/// Which services, persons or devices of the presence document are shown
#[derive(Debug, PartialEq, Clone)]
pub enum Provision {
    /// `<all-services/>`, `<all-persons/>` or `<all-devices/>`
    All,
    /// Only the elements tagged with one of these classes
    Classes(Vec<String>),
}
