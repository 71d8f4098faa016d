use std::collections::BTreeMap;

use crate::param::Value;

/// Parameter name to value, as built up during resolution.
pub type ValueMap = BTreeMap<&'static str, Value>;

/// A named partial assignment of `settings` parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preset {
    pub name: &'static str,
    values: &'static [(&'static str, Value)],
}

impl Preset {
    pub const fn new(name: &'static str, values: &'static [(&'static str, Value)]) -> Self {
        Self { name, values }
    }

    /// The value this preset assigns to `parameter`, if any.
    pub fn get(&self, parameter: &str) -> Option<&'static Value> {
        self.values
            .iter()
            .find(|(name, _)| *name == parameter)
            .map(|(_, value)| value)
    }

    /// Assignments in declaration order.
    pub fn values(&self) -> &'static [(&'static str, Value)] {
        self.values
    }

    /// Return `base` with every parameter this preset defines replaced.
    ///
    /// `base` is left untouched.
    pub fn overlay(&self, base: &ValueMap) -> ValueMap {
        let mut overlaid = base.clone();
        for (name, value) in self.values {
            overlaid.insert(*name, value.clone());
        }
        overlaid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static QUIET: [(&str, Value); 2] = [
        ("CoexType", Value::symbol("BLE")),
        ("FirstSlotTime", Value::int(0)),
    ];

    #[test]
    fn overlay_replaces_only_defined_parameters() {
        let preset = Preset::new("QUIET", &QUIET);
        let mut base = ValueMap::new();
        base.insert("CoexType", Value::symbol("GENERIC"));
        base.insert("FirstSlotTime", Value::int(150));
        base.insert("CoexQuota", Value::int(7500));

        let overlaid = preset.overlay(&base);

        assert_eq!(overlaid["CoexType"], Value::symbol("BLE"));
        assert_eq!(overlaid["FirstSlotTime"], Value::int(0));
        assert_eq!(overlaid["CoexQuota"], Value::int(7500));
        assert_eq!(base["CoexType"], Value::symbol("GENERIC"));
    }

    #[test]
    fn get_finds_assigned_value() {
        let preset = Preset::new("QUIET", &QUIET);
        assert_eq!(preset.get("FirstSlotTime"), Some(&Value::int(0)));
        assert_eq!(preset.get("WlanQuota"), None);
    }
}
