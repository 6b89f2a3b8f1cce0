use std::collections::BTreeSet;

/// Fields every scrapi OAI harvester collects already; only names outside
/// this set belong in a generated `property_list`.
pub(super) const BASE_SCHEMA: [&str; 7] = [
    "title",
    "contributor",
    "creator",
    "subject",
    "description",
    "language",
    "publisher",
];

const SET_SPEC: &str = "setSpec";

/// Reduce sampled field names to the harvester's property list: baseline
/// names dropped, duplicates collapsed, `setSpec` appended exactly once.
pub(super) fn extract_properties<I>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut names: BTreeSet<String> = tags
        .into_iter()
        .filter(|tag| !BASE_SCHEMA.contains(&tag.as_str()))
        .collect();
    names.remove(SET_SPEC);

    let mut properties: Vec<String> = names.into_iter().collect();
    properties.push(SET_SPEC.to_string());
    properties
}
