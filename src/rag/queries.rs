/// Turns the pass-1 answer (an itemised list) into clean search queries.
///
/// Each line loses surrounding whitespace, hyphens and spaces plus every
/// double quote; lines left empty are dropped. No count is enforced.
pub fn extract_queries(list: &str) -> Vec<String> {
    list.lines()
        .map(|line| {
            line.trim_matches(|c: char| c == '-' || c.is_whitespace())
                .replace('"', "")
                .trim()
                .to_string()
        })
        .filter(|query| !query.is_empty())
        .collect()
}
