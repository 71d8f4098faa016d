//! Built-in PTA tables and presets.
//!
//! Row order below is the payload byte order expected by the firmware.

use crate::param::{ByteWidth, Choice, ParameterSpec, Value};
use crate::preset::Preset;

pub const PRESET_3W_BLE: &str = "3W_BLE";
pub const PRESET_3W_NOT_COMBINED_ZIGBEE: &str = "3W_NOT_COMBINED_ZIGBEE";
pub const PRESET_3W_COMBINED_ZIGBEE: &str = "3W_COMBINED_ZIGBEE";

const CONFIGS: &[Choice] = &[
    Choice::new(PRESET_3W_BLE, 0),
    Choice::new(PRESET_3W_NOT_COMBINED_ZIGBEE, 1),
    Choice::new(PRESET_3W_COMBINED_ZIGBEE, 2),
];

const PTA_MODES: &[Choice] = &[
    Choice::new("1W_WLAN_MASTER", 0),
    Choice::new("1W_COEX_MASTER", 1),
    Choice::new("2W", 2),
    Choice::new("3W", 3),
    Choice::new("4W", 4),
];

const ACTIVE_LEVELS: &[Choice] = &[Choice::new("LOW", 0), Choice::new("HIGH", 1)];

const COEX_TYPES: &[Choice] = &[Choice::new("GENERIC", 0), Choice::new("BLE", 1)];

const GRANT_STATES: &[Choice] = &[Choice::new("NO_GRANT", 0), Choice::new("GRANT", 1)];

const BOOLEANS: &[Choice] = &[Choice::new("FALSE", 0), Choice::new("TRUE", 1)];

const PRIORITY_MODES: &[Choice] = &[
    Choice::new("COEX_MAXIMIZED", 0x0562),
    Choice::new("COEX_HIGH", 0x0462),
    Choice::new("BALANCED", 0x1461),
    Choice::new("WLAN_HIGH", 0x1851),
    Choice::new("WLAN_MAXIMIZED", 0x1A51),
];

const STATES: &[Choice] = &[Choice::new("OFF", 0), Choice::new("ON", 1)];

pub static SETTINGS_PARAMETERS: [ParameterSpec; 18] = [
    ParameterSpec::selector(
        "Config",
        CONFIGS,
        "Preset configuration for a common use case; listed options override it",
    ),
    ParameterSpec::symbolic("PtaMode", ByteWidth::One, PTA_MODES, Some("3W"), "PTA mode selection"),
    ParameterSpec::symbolic(
        "RequestSignalActiveLevel",
        ByteWidth::One,
        ACTIVE_LEVELS,
        Some("HIGH"),
        "Active level on REQUEST, driven by Coex to request the RF",
    ),
    ParameterSpec::symbolic(
        "PrioritySignalActiveLevel",
        ByteWidth::One,
        ACTIVE_LEVELS,
        Some("HIGH"),
        "Active level on PRIORITY, driven by Coex to set the request priority",
    ),
    ParameterSpec::symbolic(
        "FreqSignalActiveLevel",
        ByteWidth::One,
        ACTIVE_LEVELS,
        Some("HIGH"),
        "Active level on FREQ, driven by Coex in 4-wire mode when both share a band",
    ),
    ParameterSpec::symbolic(
        "GrantSignalActiveLevel",
        ByteWidth::One,
        ACTIVE_LEVELS,
        Some("LOW"),
        "Active level on GRANT, driven by PTA to grant the RF to Coex",
    ),
    ParameterSpec::symbolic("CoexType", ByteWidth::One, COEX_TYPES, Some("GENERIC"), "Coex type"),
    ParameterSpec::symbolic(
        "DefaultGrantState",
        ByteWidth::One,
        GRANT_STATES,
        Some("GRANT"),
        "State of GRANT before arbitration at GrantValidTime",
    ),
    ParameterSpec::symbolic(
        "SimultaneousRxAccesses",
        ByteWidth::One,
        BOOLEANS,
        Some("FALSE"),
        "Allow Coex and Wlan to receive concurrently (combined mode)",
    ),
    ParameterSpec::numeric(
        "PrioritySamplingTime",
        ByteWidth::One,
        Some(10),
        "Microseconds from Coex request to PRIORITY sampling (1 to 31)",
    ),
    ParameterSpec::numeric(
        "TxRxSamplingTime",
        ByteWidth::One,
        Some(50),
        "Microseconds from Coex request to directionality sampling (PrioritySamplingTime to 63)",
    ),
    ParameterSpec::numeric(
        "FreqSamplingTime",
        ByteWidth::One,
        Some(40),
        "Microseconds from Coex request to FREQ sampling (1 to 127)",
    ),
    ParameterSpec::numeric(
        "GrantValidTime",
        ByteWidth::One,
        Some(72),
        "Microseconds from Coex request to GRANT assertion (max(TxRxSamplingTime, FreqSamplingTime) to 255)",
    ),
    ParameterSpec::numeric(
        "FemControlTime",
        ByteWidth::One,
        Some(140),
        "Microseconds from Coex request to FEM control (GrantValidTime to 255)",
    ),
    ParameterSpec::numeric(
        "FirstSlotTime",
        ByteWidth::One,
        Some(150),
        "Microseconds from Coex request to start of Rx or Tx (GrantValidTime to 255)",
    ),
    ParameterSpec::numeric(
        "PeriodicTxRxSamplingTime",
        ByteWidth::Two,
        Some(1),
        "Period in microseconds of directionality samplings after FirstSlotTime (1 to 1023)",
    ),
    ParameterSpec::numeric(
        "CoexQuota",
        ByteWidth::Two,
        Some(7500),
        "Microseconds the RF stays granted to Coex before moving to Wlan",
    ),
    ParameterSpec::numeric(
        "WlanQuota",
        ByteWidth::Two,
        Some(7500),
        "Microseconds the RF stays granted to Wlan before moving to Coex",
    ),
];

pub static PRIORITY_PARAMETERS: [ParameterSpec; 1] = [ParameterSpec::symbolic(
    "PriorityMode",
    ByteWidth::Four,
    PRIORITY_MODES,
    None,
    "Arbitration balance between Coex and Wlan",
)];

pub static STATE_PARAMETERS: [ParameterSpec; 1] = [ParameterSpec::symbolic(
    "State",
    ByteWidth::Four,
    STATES,
    None,
    "PTA on or off",
)];

static BLE: [(&str, Value); 17] = [
    ("PtaMode", Value::symbol("3W")),
    ("RequestSignalActiveLevel", Value::symbol("HIGH")),
    ("PrioritySignalActiveLevel", Value::symbol("HIGH")),
    ("FreqSignalActiveLevel", Value::symbol("HIGH")),
    ("GrantSignalActiveLevel", Value::symbol("LOW")),
    ("CoexType", Value::symbol("BLE")),
    ("DefaultGrantState", Value::symbol("GRANT")),
    ("SimultaneousRxAccesses", Value::symbol("FALSE")),
    ("PrioritySamplingTime", Value::int(10)),
    ("TxRxSamplingTime", Value::int(0)),
    ("FreqSamplingTime", Value::int(0)),
    ("GrantValidTime", Value::int(72)),
    ("FemControlTime", Value::int(140)),
    ("FirstSlotTime", Value::int(0)),
    ("PeriodicTxRxSamplingTime", Value::int(0)),
    ("CoexQuota", Value::int(7500)),
    ("WlanQuota", Value::int(7500)),
];

static NOT_COMBINED_ZIGBEE: [(&str, Value); 17] = [
    ("PtaMode", Value::symbol("3W")),
    ("RequestSignalActiveLevel", Value::symbol("HIGH")),
    ("PrioritySignalActiveLevel", Value::symbol("HIGH")),
    ("FreqSignalActiveLevel", Value::symbol("HIGH")),
    ("GrantSignalActiveLevel", Value::symbol("LOW")),
    ("CoexType", Value::symbol("GENERIC")),
    ("DefaultGrantState", Value::symbol("GRANT")),
    ("SimultaneousRxAccesses", Value::symbol("FALSE")),
    ("PrioritySamplingTime", Value::int(10)),
    ("TxRxSamplingTime", Value::int(0)),
    ("FreqSamplingTime", Value::int(0)),
    ("GrantValidTime", Value::int(20)),
    ("FemControlTime", Value::int(20)),
    ("FirstSlotTime", Value::int(0)),
    ("PeriodicTxRxSamplingTime", Value::int(0)),
    ("CoexQuota", Value::int(7500)),
    ("WlanQuota", Value::int(7500)),
];

static COMBINED_ZIGBEE: [(&str, Value); 17] = [
    ("PtaMode", Value::symbol("3W")),
    ("RequestSignalActiveLevel", Value::symbol("HIGH")),
    ("PrioritySignalActiveLevel", Value::symbol("HIGH")),
    ("FreqSignalActiveLevel", Value::symbol("HIGH")),
    ("GrantSignalActiveLevel", Value::symbol("LOW")),
    ("CoexType", Value::symbol("GENERIC")),
    ("DefaultGrantState", Value::symbol("GRANT")),
    ("SimultaneousRxAccesses", Value::symbol("TRUE")),
    ("PrioritySamplingTime", Value::int(10)),
    ("TxRxSamplingTime", Value::int(30)),
    ("FreqSamplingTime", Value::int(0)),
    ("GrantValidTime", Value::int(40)),
    ("FemControlTime", Value::int(40)),
    ("FirstSlotTime", Value::int(40)),
    ("PeriodicTxRxSamplingTime", Value::int(1)),
    ("CoexQuota", Value::int(7500)),
    ("WlanQuota", Value::int(7500)),
];

/// The three `settings` presets.
pub fn builtin_presets() -> Vec<Preset> {
    vec![
        Preset::new(PRESET_3W_BLE, &BLE),
        Preset::new(PRESET_3W_NOT_COMBINED_ZIGBEE, &NOT_COMBINED_ZIGBEE),
        Preset::new(PRESET_3W_COMBINED_ZIGBEE, &COMBINED_ZIGBEE),
    ]
}
