use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::pipeline::language::WeekdaySet;

/// Weekday label → food description, in weekday order.
///
/// Serialized as a JSON object whose key order follows the weekday set.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Menu {
    days: Vec<(String, String)>,
}

impl Menu {
    /// Every label mapped to an empty description.
    pub fn empty(weekdays: &WeekdaySet) -> Self {
        Self {
            days: weekdays
                .labels()
                .iter()
                .map(|d| (d.clone(), String::new()))
                .collect(),
        }
    }

    pub fn get(&self, day: &str) -> Option<&str> {
        self.days
            .iter()
            .find(|(d, _)| d == day)
            .map(|(_, food)| food.as_str())
    }

    pub(crate) fn entry_mut(&mut self, day: &str) -> Option<&mut String> {
        self.days
            .iter_mut()
            .find(|(d, _)| d == day)
            .map(|(_, food)| food)
    }

    pub fn days(&self) -> impl Iterator<Item = &str> {
        self.days.iter().map(|(d, _)| d.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.days.iter().map(|(d, f)| (d.as_str(), f.as_str()))
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// True when no day has any food text.
    pub fn is_blank(&self) -> bool {
        self.days.iter().all(|(_, f)| f.is_empty())
    }

    pub(crate) fn trim_entries(&mut self) {
        for (_, food) in &mut self.days {
            let trimmed = food.trim();
            if trimmed.len() != food.len() {
                *food = trimmed.to_string();
            }
        }
    }
}

impl<D: Into<String>, F: Into<String>> FromIterator<(D, F)> for Menu {
    fn from_iter<I: IntoIterator<Item = (D, F)>>(iter: I) -> Self {
        Self {
            days: iter.into_iter().map(|(d, f)| (d.into(), f.into())).collect(),
        }
    }
}

impl Serialize for Menu {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.days.len()))?;
        for (day, food) in &self.days {
            map.serialize_entry(day, food)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Menu {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct MenuVisitor;

        impl<'de> Visitor<'de> for MenuVisitor {
            type Value = Menu;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of weekday to food description")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Menu, A::Error> {
                let mut days = Vec::with_capacity(access.size_hint().unwrap_or(5));
                while let Some((day, food)) = access.next_entry::<String, String>()? {
                    days.push((day, food));
                }
                Ok(Menu { days })
            }
        }

        deserializer.deserialize_map(MenuVisitor)
    }
}
