//! Template context building
//!
//! Exposes the parameter set to cloud-config templates. Each parameter is
//! reachable under its Go-style field name (`NumberOfNodes.Value`) and its
//! document name (`numberOfNodes.value`).

use crate::params::ParameterSet;
use minijinja::value::Value;
use std::collections::{BTreeMap, HashMap};

/// Build the template context from the parameter set.
///
/// `customData` is left out: it holds the output of this very rendering.
pub fn build_context(params: &ParameterSet) -> HashMap<String, Value> {
    let entries = [
        ("Location", "location", Value::from(params.location.value.clone())),
        (
            "NewStorageAccountName",
            "newStorageAccountName",
            Value::from(params.new_storage_account_name.value.clone()),
        ),
        ("VmSize", "vmSize", Value::from(params.vm_size.value.clone())),
        (
            "NumberOfNodes",
            "numberOfNodes",
            Value::from(params.number_of_nodes.value),
        ),
        (
            "AdminUserName",
            "adminUserName",
            Value::from(params.admin_user_name.value.clone()),
        ),
        (
            "SshKeyData",
            "sshKeyData",
            Value::from(params.ssh_key_data.value.clone()),
        ),
        (
            "DiscoveryUrl",
            "discoveryUrl",
            Value::from(params.discovery_url.value.clone()),
        ),
        (
            "VmNamePrefix",
            "vmNamePrefix",
            Value::from(params.vm_name_prefix.value.clone()),
        ),
    ];

    let mut ctx = HashMap::new();
    for (field_name, param_name, value) in entries {
        let wrapped = parameter_value(value);
        ctx.insert(field_name.to_string(), wrapped.clone());
        ctx.insert(param_name.to_string(), wrapped);
    }

    ctx
}

/// Wrap a scalar the way it appears in the document: `{Value, value}`
fn parameter_value(value: Value) -> Value {
    let mut map = BTreeMap::new();
    map.insert("Value", value.clone());
    map.insert("value", value);
    Value::from_serialize(&map)
}
