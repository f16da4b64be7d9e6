//! Named items and groups of items
//!
//! `resolve("all red")` broadcasts `red` to every member of group `all`, one
//! instruction per member in the group's order. A plain item name yields a
//! single instruction. Each instance owns its tables.

use ahash::AHashMap;

use crate::core::config::{check_groups, GroupConfig, ItemConfig};
use crate::core::error::{ActError, Result};
use crate::core::types::{PublishInstruction, Resolution};

#[derive(Debug, Clone)]
pub struct GroupFanoutResolver {
    name: String,
    exchange: String,
    /// `{base_topic}.{location}`, items append their address
    topic_prefix: String,
    items: Vec<ItemConfig>,
    groups: Vec<GroupConfig>,
    item_index: AHashMap<String, usize>,
    group_index: AHashMap<String, usize>,
}

impl GroupFanoutResolver {
    /// Fails if a group names an item that does not exist
    pub fn new(
        name: impl Into<String>,
        exchange: impl Into<String>,
        base_topic: &str,
        location: &str,
        items: Vec<ItemConfig>,
        groups: Vec<GroupConfig>,
    ) -> Result<Self> {
        let name = name.into();
        check_groups(&name, &items, &groups)?;

        let item_index = items
            .iter()
            .enumerate()
            .map(|(i, item)| (item.name.clone(), i))
            .collect();
        let group_index = groups
            .iter()
            .enumerate()
            .map(|(i, group)| (group.name.clone(), i))
            .collect();

        Ok(Self {
            name,
            exchange: exchange.into(),
            topic_prefix: format!("{}.{}", base_topic, location),
            items,
            groups,
            item_index,
            group_index,
        })
    }

    /// Resolve `"<target> <value>"`
    pub fn resolve(&self, argument: &str) -> Result<Resolution> {
        let fields: Vec<&str> = argument.split_whitespace().collect();
        let &[target, value] = fields.as_slice() else {
            return Err(ActError::malformed(
                &self.name,
                argument,
                format!("expected TARGET VALUE, got {} field(s)", fields.len()),
            ));
        };

        let addresses: Vec<&str> = if let Some(&i) = self.item_index.get(target) {
            vec![self.items[i].address.as_str()]
        } else if let Some(&g) = self.group_index.get(target) {
            self.groups[g]
                .members
                .iter()
                .map(|member| self.address_of(member))
                .collect::<Result<_>>()?
        } else {
            return Err(ActError::unknown_target(&self.name, target));
        };

        Ok(Resolution::Publish(
            addresses
                .into_iter()
                .map(|address| PublishInstruction::new(&self.exchange, self.topic(address), value))
                .collect(),
        ))
    }

    fn address_of(&self, item: &str) -> Result<&str> {
        self.item_index
            .get(item)
            .map(|&i| self.items[i].address.as_str())
            .ok_or_else(|| {
                ActError::Config(format!("{}: group member {} has no item entry", self.name, item))
            })
    }

    fn topic(&self, address: &str) -> String {
        format!("{}.{}", self.topic_prefix, address)
    }

    /// Item names, then group names, then `VALUE`
    pub fn usage(&self) -> Vec<String> {
        self.items
            .iter()
            .map(|i| i.name.clone())
            .chain(self.groups.iter().map(|g| g.name.clone()))
            .chain(std::iter::once("VALUE".to_string()))
            .collect()
    }

    pub fn help_detail(&self) -> String {
        let lamps: Vec<&str> = self.items.iter().map(|i| i.name.as_str()).collect();
        let groups: Vec<&str> = self.groups.iter().map(|g| g.name.as_str()).collect();
        format!("LAMPS: {} GROUPS: {}", lamps.join(", "), groups.join(", "))
    }
}
