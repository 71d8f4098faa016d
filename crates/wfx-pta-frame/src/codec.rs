use bytes::{BufMut, Bytes, BytesMut};
use serde::Serialize;
use tracing::debug;

use wfx_pta_schema::{ParameterSpec, PtaCommand, ResolvedCommand, Value};

use crate::error::{FrameError, Result};

/// Frame header: length (2) + command id (2) = 4 bytes.
pub const HEADER_SIZE: usize = 4;

/// Largest frame the 16-bit length field can describe.
pub const MAX_FRAME_LEN: usize = u16::MAX as usize;

/// Where one parameter landed in the frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldSpan {
    pub name: &'static str,
    pub value: Value,
    /// Integer code written for `value`.
    pub code: u64,
    /// Byte offset from the start of the frame.
    pub offset: usize,
    /// Field width in bytes.
    pub width: usize,
}

/// An encoded PTA command, header included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    command: PtaCommand,
    bytes: Bytes,
    fields: Vec<FieldSpan>,
}

impl Frame {
    pub fn command(&self) -> PtaCommand {
        self.command
    }

    /// Total length in bytes, header included.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Always false: a frame carries at least its header.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The bytes after the header.
    pub fn payload(&self) -> &[u8] {
        &self.bytes[HEADER_SIZE..]
    }

    /// The full frame as sent on the wire.
    pub fn wire_bytes(&self) -> &Bytes {
        &self.bytes
    }

    /// Per-parameter layout of the payload, in table order.
    pub fn fields(&self) -> &[FieldSpan] {
        &self.fields
    }

    /// The frame as a `\xHH` token string, two lowercase hex digits per byte.
    pub fn escaped(&self) -> String {
        escape(&self.bytes)
    }
}

/// Render bytes as `\xHH` tokens.
pub fn escape(bytes: &[u8]) -> String {
    bytes.iter().map(|byte| format!("\\x{byte:02x}")).collect()
}

/// Encode a resolved command into its wire frame.
///
/// Wire format:
/// ```text
/// ┌──────────────┬──────────────┬──────────────────────────┐
/// │ Length (2B)  │ Command (2B) │ Payload                  │
/// │ LE, header   │ LE           │ one LE field per encoded │
/// │ included     │ 0x002B..2D   │ parameter, table order   │
/// └──────────────┴──────────────┴──────────────────────────┘
/// ```
pub fn encode(resolved: &ResolvedCommand) -> Result<Frame> {
    let command = resolved.command();
    let payload_len: usize = resolved
        .parameters()
        .iter()
        .map(|parameter| parameter.spec.width.bytes())
        .sum();
    let total = frame_len(payload_len)?;

    let mut dst = BytesMut::with_capacity(usize::from(total));
    dst.put_u16_le(total);
    dst.put_u16_le(command.id());

    let mut fields = Vec::with_capacity(resolved.parameters().len());
    for parameter in resolved.parameters() {
        let offset = dst.len();
        let code = pack_field(command, &parameter.spec, &parameter.value, &mut dst)?;
        fields.push(FieldSpan {
            name: parameter.spec.name,
            value: parameter.value.clone(),
            code,
            offset,
            width: parameter.spec.width.bytes(),
        });
    }

    debug!(%command, len = total, "encoded frame");
    Ok(Frame {
        command,
        bytes: dst.freeze(),
        fields,
    })
}

fn frame_len(payload_len: usize) -> Result<u16> {
    let size = HEADER_SIZE + payload_len;
    u16::try_from(size).map_err(|_| FrameError::FrameTooLarge {
        size,
        max: MAX_FRAME_LEN,
    })
}

/// Append one parameter as `width` little-endian bytes and return its code.
fn pack_field(
    command: PtaCommand,
    spec: &ParameterSpec,
    value: &Value,
    dst: &mut BytesMut,
) -> Result<u64> {
    let code = spec
        .code_of(value)
        .filter(|code| *code <= spec.width.max_value())
        .ok_or_else(|| FrameError::EncodingInconsistency {
            command,
            parameter: spec.name,
            value: value.to_string(),
        })?;
    dst.put_uint_le(code, spec.width.bytes());
    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wfx_pta_schema::{ByteWidth, Choice, Overrides, Resolver, SchemaRegistry};

    fn frame(command: PtaCommand, preset: Option<&str>, pairs: &[(&str, &str)]) -> Frame {
        let registry = SchemaRegistry::builtin().unwrap();
        let overrides: Overrides = pairs
            .iter()
            .map(|(name, value)| (name.to_string(), Value::parse(value)))
            .collect();
        let resolution = Resolver::new(&registry)
            .resolve(command, preset, &overrides)
            .unwrap();
        encode(&resolution.command).unwrap()
    }

    #[test]
    fn state_on_frame() {
        let frame = frame(PtaCommand::State, None, &[("State", "ON")]);
        assert_eq!(frame.escaped(), r"\x08\x00\x2d\x00\x01\x00\x00\x00");
    }

    #[test]
    fn priority_balanced_frame() {
        let frame = frame(PtaCommand::Priority, None, &[("PriorityMode", "BALANCED")]);
        assert_eq!(frame.wire_bytes().as_ref(), [0x08, 0x00, 0x2c, 0x00, 0x61, 0x14, 0x00, 0x00]);
        assert_eq!(frame.payload(), [0x61, 0x14, 0x00, 0x00]);
    }

    #[test]
    fn settings_default_frame() {
        let frame = frame(PtaCommand::Settings, None, &[]);
        assert_eq!(
            frame.escaped(),
            concat!(
                r"\x18\x00\x2b\x00",
                r"\x03\x01\x01\x01\x00\x00\x01\x00",
                r"\x0a\x32\x28\x48\x8c\x96",
                r"\x01\x00\x4c\x1d\x4c\x1d"
            )
        );
    }

    #[test]
    fn settings_ble_preset_frame() {
        let frame = frame(PtaCommand::Settings, Some("3W_BLE"), &[]);
        assert_eq!(
            frame.escaped(),
            concat!(
                r"\x18\x00\x2b\x00",
                r"\x03\x01\x01\x01\x00\x01\x01\x00",
                r"\x0a\x00\x00\x48\x8c\x00",
                r"\x00\x00\x4c\x1d\x4c\x1d"
            )
        );
    }

    #[test]
    fn header_carries_length_and_command_id() {
        for (command, pairs) in [
            (PtaCommand::Settings, vec![]),
            (PtaCommand::Priority, vec![("PriorityMode", "WLAN_MAXIMIZED")]),
            (PtaCommand::State, vec![("State", "OFF")]),
        ] {
            let frame = frame(command, None, &pairs);
            let bytes = frame.wire_bytes();
            let len = u16::from_le_bytes([bytes[0], bytes[1]]);
            let id = u16::from_le_bytes([bytes[2], bytes[3]]);
            assert_eq!(usize::from(len), HEADER_SIZE + frame.payload().len());
            assert_eq!(usize::from(len), frame.len());
            assert_eq!(id, command.id());
        }
    }

    #[test]
    fn single_override_changes_only_its_field() {
        let base = frame(PtaCommand::Settings, Some("3W_COMBINED_ZIGBEE"), &[]);
        let changed = frame(
            PtaCommand::Settings,
            Some("3W_COMBINED_ZIGBEE"),
            &[("CoexQuota", "0x1234")],
        );

        let span = base
            .fields()
            .iter()
            .find(|field| field.name == "CoexQuota")
            .unwrap();
        let range = span.offset..span.offset + span.width;

        for (index, (a, b)) in base
            .wire_bytes()
            .iter()
            .zip(changed.wire_bytes().iter())
            .enumerate()
        {
            if range.contains(&index) {
                continue;
            }
            assert_eq!(a, b, "byte {index} changed");
        }
        assert_eq!(&changed.wire_bytes()[range], [0x34, 0x12]);
    }

    #[test]
    fn preset_frame_differs_only_where_preset_changes_defaults() {
        let defaults = frame(PtaCommand::Settings, None, &[]);
        let preset = frame(PtaCommand::Settings, Some("3W_BLE"), &[]);

        let changed: Vec<_> = defaults
            .fields()
            .iter()
            .zip(preset.fields())
            .filter(|(a, b)| a.code != b.code)
            .map(|(a, _)| a.name)
            .collect();
        assert_eq!(
            changed,
            [
                "CoexType",
                "TxRxSamplingTime",
                "FreqSamplingTime",
                "FirstSlotTime",
                "PeriodicTxRxSamplingTime"
            ]
        );
    }

    #[test]
    fn field_spans_tile_the_payload() {
        let frame = frame(PtaCommand::Settings, None, &[]);
        let mut expected = HEADER_SIZE;
        for field in frame.fields() {
            assert_eq!(field.offset, expected);
            expected += field.width;
        }
        assert_eq!(expected, frame.len());
        assert!(frame.fields().iter().all(|field| field.name != "Config"));
    }

    #[test]
    fn encoding_is_deterministic() {
        let a = frame(PtaCommand::Settings, Some("3W_BLE"), &[("WlanQuota", "100")]);
        let b = frame(PtaCommand::Settings, Some("3W_BLE"), &[("WlanQuota", "100")]);
        assert_eq!(a, b);
    }

    #[test]
    fn escape_uses_lowercase_hex() {
        assert_eq!(escape(&[0x00, 0xab, 0xff]), r"\x00\xab\xff");
        assert_eq!(escape(&[]), "");
    }

    #[test]
    fn frame_len_rejects_oversized_payload() {
        assert_eq!(frame_len(20).unwrap(), 24);
        assert!(matches!(
            frame_len(MAX_FRAME_LEN),
            Err(FrameError::FrameTooLarge { max: MAX_FRAME_LEN, .. })
        ));
    }

    #[test]
    fn pack_field_rejects_unknown_symbol() {
        const SWITCH: &[Choice] = &[Choice::new("OFF", 0), Choice::new("ON", 1)];
        let spec = ParameterSpec::symbolic("State", ByteWidth::Four, SWITCH, None, "");
        let mut dst = BytesMut::new();

        let result = pack_field(PtaCommand::State, &spec, &Value::symbol("AUTO"), &mut dst);
        assert!(matches!(
            result,
            Err(FrameError::EncodingInconsistency { parameter: "State", .. })
        ));
        assert!(dst.is_empty());
    }

    #[test]
    fn pack_field_rejects_value_wider_than_field() {
        let spec = ParameterSpec::numeric("GrantValidTime", ByteWidth::One, Some(72), "");
        let mut dst = BytesMut::new();
        let result = pack_field(PtaCommand::Settings, &spec, &Value::int(300), &mut dst);
        assert!(matches!(result, Err(FrameError::EncodingInconsistency { .. })));
    }
}
