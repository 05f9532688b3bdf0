//! Matching between an employee display name and a task's assignment list.
//!
//! Assignment lists are free text ("Alice Smith, Bob Jones"), so both sides
//! are normalized: lowercase, all whitespace removed.

const SEPARATORS: [char; 3] = [',', ';', '|'];

pub fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

fn members(list: &str) -> impl Iterator<Item = &str> {
    list.split(SEPARATORS)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// True when `name` appears in `assigned_to`: whole field, first element,
/// last element or any element of the delimited list.
pub fn is_assigned(assigned_to: &str, name: &str) -> bool {
    let needle = normalize(name);
    if needle.is_empty() {
        return false;
    }

    let field = normalize(assigned_to);
    if field == needle {
        return true;
    }

    members(assigned_to).any(|m| normalize(m) == needle)
}

/// First listed assignee, trimmed, as written in the task.
pub fn first_assignee(assigned_to: &str) -> Option<&str> {
    members(assigned_to).next()
}
