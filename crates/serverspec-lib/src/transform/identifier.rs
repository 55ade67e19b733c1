//! Example id to Sensu check name normalisation

/// Turn an RSpec example id into a name usable as a Sensu check name.
///
/// Separators (`/`, `[`, `]`, `:`) become `-`, then one leading `.`, one
/// leading `-` and one trailing `-` are removed, in that order.
pub fn normalize_id(raw: &str) -> String {
    let id = raw.replace(['/', '[', ']', ':'], "-");
    let id = id.strip_prefix('.').unwrap_or(&id);
    let id = id.strip_prefix('-').unwrap_or(id);
    let id = id.strip_suffix('-').unwrap_or(id);
    id.to_string()
}
