//! Command line configuration
//!
//! Parses the deployment flags into a [`ParameterSet`]. Flags use the
//! parameter names from the deployment template (`-numberOfNodes`), and the
//! single-dash spelling is accepted alongside `--numberOfNodes`.

use crate::params::ParameterSet;
use crate::resolve::DISCOVERY_ENDPOINT;
use clap::Parser;
use std::ffi::OsString;

pub const DEFAULT_LOCATION: &str = "West US";
pub const DEFAULT_STORAGE_ACCOUNT_NAME: &str = "costorageaccountre";
pub const DEFAULT_ADMIN_USER_NAME: &str = "core";
pub const DEFAULT_NUMBER_OF_NODES: i64 = 3;
pub const DEFAULT_VM_NAME_PREFIX: &str = "core";
/// Help text advertises Standard_A1, but released builds have always used "core"
pub const DEFAULT_VM_SIZE: &str = "core";

/// Long flags that may be written with a single dash
const LONG_FLAGS: &[&str] = &[
    "location",
    "newStorageAccountName",
    "adminUserName",
    "numberOfNodes",
    "vmNamePrefix",
    "vmSize",
    "verbose",
    "help",
    "version",
];

#[derive(Parser, Debug, Clone)]
#[command(name = "azure-paramgen")]
#[command(
    author,
    version,
    about = "Generate azuredeploy.parameters.json for a CoreOS cluster",
    long_about = None
)]
pub struct Cli {
    /// VM location
    #[arg(long = "location", default_value = DEFAULT_LOCATION)]
    pub location: String,

    /// Storage account name
    #[arg(long = "newStorageAccountName", default_value = DEFAULT_STORAGE_ACCOUNT_NAME)]
    pub new_storage_account_name: String,

    /// Admin user name
    #[arg(long = "adminUserName", default_value = DEFAULT_ADMIN_USER_NAME)]
    pub admin_user_name: String,

    /// Number of nodes
    #[arg(
        long = "numberOfNodes",
        default_value_t = DEFAULT_NUMBER_OF_NODES,
        allow_hyphen_values = true,
        value_parser = parse_int
    )]
    pub number_of_nodes: i64,

    /// VM name prefix
    #[arg(long = "vmNamePrefix", default_value = DEFAULT_VM_NAME_PREFIX)]
    pub vm_name_prefix: String,

    /// VM Size. (default: Standard_A1)
    #[arg(long = "vmSize", default_value = DEFAULT_VM_SIZE)]
    pub vm_size: String,

    /// etcd discovery service endpoint
    #[arg(
        long = "discoveryEndpoint",
        env = "AZURE_PARAMGEN_DISCOVERY_ENDPOINT",
        default_value = DISCOVERY_ENDPOINT,
        hide = true
    )]
    pub discovery_endpoint: String,

    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Parse the process arguments, exiting with usage on malformed flags
    pub fn from_env() -> Self {
        Self::parse_from(normalize_args(std::env::args_os()))
    }

    /// Parse an explicit argument list (first item is the program name)
    pub fn try_from_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        Self::try_parse_from(normalize_args(args))
    }

    /// Build the parameter set; resolved fields start out empty
    pub fn parameters(&self) -> ParameterSet {
        ParameterSet {
            location: self.location.clone().into(),
            new_storage_account_name: self.new_storage_account_name.clone().into(),
            vm_size: self.vm_size.clone().into(),
            number_of_nodes: self.number_of_nodes.into(),
            admin_user_name: self.admin_user_name.clone().into(),
            vm_name_prefix: self.vm_name_prefix.clone().into(),
            ..Default::default()
        }
    }
}

/// Parse an integer flag value with Go base-prefix rules.
///
/// `0x`/`0X` is hex, `0o`/`0O` or a bare leading `0` is octal, `0b`/`0B` is
/// binary, anything else is decimal. Digit-separating underscores are ignored.
pub fn parse_int(value: &str) -> Result<i64, String> {
    let (negative, unsigned) = match value.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, value.strip_prefix('+').unwrap_or(value)),
    };

    let (radix, digits) = if let Some(d) = strip_radix_prefix(unsigned, 'x') {
        (16, d)
    } else if let Some(d) = strip_radix_prefix(unsigned, 'o') {
        (8, d)
    } else if let Some(d) = strip_radix_prefix(unsigned, 'b') {
        (2, d)
    } else if unsigned.len() > 1 && unsigned.starts_with('0') {
        (8, &unsigned[1..])
    } else {
        (10, unsigned)
    };

    let digits = digits.replace('_', "");

    if digits.is_empty() || digits.starts_with(['+', '-']) {
        return Err(format!("invalid value \"{}\": not an integer", value));
    }

    let signed = if negative {
        format!("-{}", digits)
    } else {
        digits
    };

    i64::from_str_radix(&signed, radix)
        .map_err(|e| format!("invalid value \"{}\": {}", value, e))
}

fn strip_radix_prefix(value: &str, marker: char) -> Option<&str> {
    let rest = value.strip_prefix('0')?;
    rest.strip_prefix(marker)
        .or_else(|| rest.strip_prefix(marker.to_ascii_uppercase()))
}

/// Rewrite `-flag` and `-flag=value` to `--flag` forms for known long flags.
///
/// Everything after a bare `--` is left untouched.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut out = Vec::new();
    let mut passthrough = false;

    for (idx, arg) in args.into_iter().enumerate() {
        let arg: OsString = arg.into();

        if idx == 0 || passthrough {
            out.push(arg);
            continue;
        }

        let rewritten = match arg.to_str() {
            Some("--") => {
                passthrough = true;
                None
            }
            Some(s) => single_dash_long(s).map(|name| OsString::from(format!("-{}", name))),
            None => None,
        };

        out.push(rewritten.unwrap_or(arg));
    }

    out
}

fn single_dash_long(arg: &str) -> Option<&str> {
    let rest = arg.strip_prefix('-')?;
    if rest.starts_with('-') {
        return None;
    }
    let name = rest.split('=').next().unwrap_or(rest);
    LONG_FLAGS.contains(&name).then_some(arg)
}
