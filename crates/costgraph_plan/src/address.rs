//! Helpers for splitting resource addresses.
//!
//! An address is a module path followed by a resource part, for example
//! `module.network.module.nat.aws_eip.this[1]`. Data sources carry an extra
//! `data.` segment in their resource part.

/// The resource part of an address, without any module prefix.
///
/// `module.a.module.b.aws_instance.web[0]` gives `aws_instance.web[0]`.
pub fn resource_part(address: &str) -> String {
    let parts: Vec<&str> = address.split('.').collect();
    let n = parts.len();

    if n >= 3 && parts[n - 3] == "data" {
        return parts[n - 3..].join(".");
    }
    if n >= 2 {
        return parts[n - 2..].join(".");
    }
    address.to_string()
}

/// The module prefix of an address including its trailing dot, or an empty
/// string for root module resources.
pub fn module_part(address: &str) -> String {
    let parts: Vec<&str> = address.split('.').collect();
    let n = parts.len();

    let module_parts = if n >= 3 && parts[n - 3] == "data" {
        &parts[..n - 3]
    } else if n >= 2 {
        &parts[..n - 2]
    } else {
        &parts[..0]
    };

    if module_parts.is_empty() {
        String::new()
    } else {
        format!("{}.", module_parts.join("."))
    }
}

/// Names of the modules an address is nested in, outermost first.
/// Module count or for_each keys are dropped.
pub fn module_names(address: &str) -> Vec<String> {
    let Ok(re) = regex::Regex::new(r"module\.([^.\[]+)") else {
        return Vec::new();
    };

    re.captures_iter(&module_part(address))
        .filter_map(|c| c.get(1).map(|m| m.as_str().to_string()))
        .collect()
}

/// The count index of the resource itself, ignoring any module index.
pub fn count_index(address: &str) -> Option<usize> {
    let re = regex::Regex::new(r"\[(\d+)\]$").ok()?;
    let part = resource_part(address);
    let caps = re.captures(&part)?;
    caps.get(1)?.as_str().parse().ok()
}

/// Strip a trailing index or key from a resource part.
pub fn strip_index(resource: &str) -> &str {
    match resource.find('[') {
        Some(i) => &resource[..i],
        None => resource,
    }
}

/// Whether the address names a data source rather than a managed resource.
pub fn is_data_source(address: &str) -> bool {
    resource_part(address).starts_with("data.")
}
