//! Deployment parameters document
//!
//! Mirrors the Azure Resource Manager `deploymentParameters.json` schema for
//! the CoreOS cluster template. The field set is closed.

use serde::{Deserialize, Serialize};
use serde_json::ser::{Formatter, PrettyFormatter};
use std::io;

/// Schema identifier written to `$schema`
pub const DEPLOYMENT_PARAMETERS_SCHEMA: &str =
    "http://schema.management.azure.com/schemas/2015-01-01/deploymentParameters.json#";

/// Content version written to `contentVersion`
pub const CONTENT_VERSION: &str = "1.0.0.0";

/// Prefix for every line after the first
const JSON_PREFIX: &[u8] = b" ";

/// Indentation step per nesting level
const JSON_INDENT: &[u8] = b"    ";

/// A single parameter, serialized as `{"value": ...}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterValue<T> {
    pub value: T,
}

impl<T> ParameterValue<T> {
    pub fn new(value: T) -> Self {
        Self { value }
    }
}

impl<T> From<T> for ParameterValue<T> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

pub type StringParameter = ParameterValue<String>;
pub type IntParameter = ParameterValue<i64>;

impl StringParameter {
    /// Whether the value still needs to be resolved
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

/// The fixed parameter set of the cluster deployment template
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterSet {
    pub location: StringParameter,
    pub new_storage_account_name: StringParameter,
    pub vm_size: StringParameter,
    pub number_of_nodes: IntParameter,
    pub admin_user_name: StringParameter,
    pub ssh_key_data: StringParameter,
    pub discovery_url: StringParameter,
    pub vm_name_prefix: StringParameter,
    /// Base64-encoded cloud-config
    pub custom_data: StringParameter,
}

/// The document written to `azuredeploy.parameters.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentDocument {
    #[serde(rename = "$schema")]
    pub schema: String,
    pub content_version: String,
    pub parameters: ParameterSet,
}

impl DeploymentDocument {
    /// Wrap a parameter set with the fixed schema and content version
    pub fn new(parameters: ParameterSet) -> Self {
        Self {
            schema: DEPLOYMENT_PARAMETERS_SCHEMA.to_string(),
            content_version: CONTENT_VERSION.to_string(),
            parameters,
        }
    }

    /// Serialize to indented JSON.
    ///
    /// Every line after the first carries a one-space prefix and nesting is
    /// indented by four spaces. No trailing newline is emitted. `<`, `>`,
    /// `&`, U+2028 and U+2029 are written as `\u` escapes.
    pub fn to_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        let mut buf = Vec::new();
        let mut ser =
            serde_json::Serializer::with_formatter(&mut buf, HtmlSafeFormatter::new(JSON_INDENT));
        self.serialize(&mut ser)?;

        // Newlines inside string values are escaped, so every raw '\n' is a line break
        let mut out = Vec::with_capacity(buf.len() + buf.len() / 8);
        for byte in buf {
            out.push(byte);
            if byte == b'\n' {
                out.extend_from_slice(JSON_PREFIX);
            }
        }
        Ok(out)
    }
}

/// Pretty formatter that also escapes HTML-sensitive characters and the
/// JavaScript line terminators inside strings
struct HtmlSafeFormatter<'a> {
    inner: PrettyFormatter<'a>,
}

impl<'a> HtmlSafeFormatter<'a> {
    fn new(indent: &'a [u8]) -> Self {
        Self {
            inner: PrettyFormatter::with_indent(indent),
        }
    }
}

impl Formatter for HtmlSafeFormatter<'_> {
    fn begin_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_array(writer)
    }

    fn end_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_array(writer)
    }

    fn begin_array_value<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.inner.begin_array_value(writer, first)
    }

    fn end_array_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_array_value(writer)
    }

    fn begin_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_object(writer)
    }

    fn end_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_object(writer)
    }

    fn begin_object_key<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.inner.begin_object_key(writer, first)
    }

    fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_object_value(writer)
    }

    fn end_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_object_value(writer)
    }

    fn write_string_fragment<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        fragment: &str,
    ) -> io::Result<()> {
        let mut start = 0;
        for (idx, c) in fragment.char_indices() {
            let escaped = match c {
                '<' => "\\u003c",
                '>' => "\\u003e",
                '&' => "\\u0026",
                '\u{2028}' => "\\u2028",
                '\u{2029}' => "\\u2029",
                _ => continue,
            };
            writer.write_all(fragment[start..idx].as_bytes())?;
            writer.write_all(escaped.as_bytes())?;
            start = idx + c.len_utf8();
        }
        writer.write_all(fragment[start..].as_bytes())
    }
}

impl Default for DeploymentDocument {
    fn default() -> Self {
        Self::new(ParameterSet::default())
    }
}
