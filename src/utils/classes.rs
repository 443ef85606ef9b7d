//! Class-name merging for utility-first CSS.
//!
//! `cn` joins class lists and resolves conflicts so that a later utility replaces an
//! earlier one from the same group, e.g. `cn(["px-2 py-1", "px-4"])` is `"py-1 px-4"`.

/// Utilities that stand alone (no value suffix) and all set `display`.
const DISPLAY: &[&str] = &[
    "block",
    "inline-block",
    "inline",
    "flex",
    "inline-flex",
    "grid",
    "inline-grid",
    "contents",
    "hidden",
    "table",
];

const POSITION: &[&str] = &["static", "fixed", "absolute", "relative", "sticky"];

const TEXT_SIZES: &[&str] = &[
    "xs", "sm", "base", "lg", "xl", "2xl", "3xl", "4xl", "5xl", "6xl", "7xl", "8xl", "9xl",
];

const TEXT_ALIGN: &[&str] = &["left", "center", "right", "justify", "start", "end"];

const FONT_WEIGHTS: &[&str] = &[
    "thin",
    "extralight",
    "light",
    "normal",
    "medium",
    "semibold",
    "bold",
    "extrabold",
    "black",
];

/// Prefixes whose value follows a dash (or is absent, as in `rounded`), longest first
/// so `px-` wins over `p-`.
const PREFIXES: &[&str] = &[
    "min-w", "max-w", "min-h", "max-h", "rounded-tl", "rounded-tr", "rounded-bl", "rounded-br",
    "rounded-t", "rounded-b", "rounded-l", "rounded-r", "rounded", "opacity", "shadow", "gap-x",
    "gap-y", "gap", "px", "py", "pt", "pb", "pl", "pr", "p", "mx", "my", "mt", "mb", "ml", "mr",
    "m", "w", "h", "bg", "z", "border", "leading", "tracking",
];

/// Groups that a shorthand group replaces: `p-2` after `px-4` drops the `px-4`.
fn overridden_by(group: &str) -> &'static [&'static str] {
    match group {
        "p" => &["px", "py", "pt", "pb", "pl", "pr"],
        "px" => &["pl", "pr"],
        "py" => &["pt", "pb"],
        "m" => &["mx", "my", "mt", "mb", "ml", "mr"],
        "mx" => &["ml", "mr"],
        "my" => &["mt", "mb"],
        "gap" => &["gap-x", "gap-y"],
        "rounded" => &[
            "rounded-t",
            "rounded-b",
            "rounded-l",
            "rounded-r",
            "rounded-tl",
            "rounded-tr",
            "rounded-bl",
            "rounded-br",
        ],
        "rounded-t" => &["rounded-tl", "rounded-tr"],
        "rounded-b" => &["rounded-bl", "rounded-br"],
        "rounded-l" => &["rounded-tl", "rounded-bl"],
        "rounded-r" => &["rounded-tr", "rounded-br"],
        _ => &[],
    }
}

/// Splits `hover:md:px-2` into (`hover:md:`, `px-2`).
fn split_variants(class: &str) -> (&str, &str) {
    match class.rfind(':') {
        Some(idx) => (&class[..=idx], &class[idx + 1..]),
        None => ("", class),
    }
}

/// The conflict group a utility belongs to, or `None` if it never conflicts.
fn group_of(utility: &str) -> Option<String> {
    let utility = utility.trim_start_matches('!');

    if DISPLAY.contains(&utility) {
        return Some("display".into());
    }
    if POSITION.contains(&utility) {
        return Some("position".into());
    }
    if let Some(value) = utility.strip_prefix("text-") {
        if TEXT_SIZES.contains(&value) {
            return Some("text-size".into());
        }
        if TEXT_ALIGN.contains(&value) {
            return Some("text-align".into());
        }
        return Some("text-color".into());
    }
    if let Some(value) = utility.strip_prefix("font-") {
        if FONT_WEIGHTS.contains(&value) {
            return Some("font-weight".into());
        }
        return Some("font-family".into());
    }
    PREFIXES
        .iter()
        .find(|prefix| {
            utility
                .strip_prefix(*prefix)
                .map_or(false, |rest| rest.is_empty() || rest.starts_with('-'))
        })
        .map(|prefix| prefix.to_string())
}

/// Merges class lists; blank entries are ignored and later utilities win.
pub fn cn<I, S>(inputs: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let classes: Vec<String> = inputs
        .into_iter()
        .flat_map(|input| {
            input
                .as_ref()
                .split_whitespace()
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .collect();

    // Walk backwards keeping the first (i.e. last-written) class per conflict key.
    // A kept shorthand also claims the keys of the groups it covers.
    let mut seen_keys: Vec<String> = Vec::new();
    let mut kept: Vec<&str> = Vec::new();
    for class in classes.iter().rev() {
        let (variants, utility) = split_variants(class);
        let group = group_of(utility);
        let key = match &group {
            Some(group) => format!("{}{}", variants, group),
            None => class.clone(),
        };
        if seen_keys.contains(&key) {
            continue;
        }
        seen_keys.push(key);
        if let Some(group) = &group {
            seen_keys.extend(
                overridden_by(group)
                    .iter()
                    .map(|covered| format!("{}{}", variants, covered)),
            );
        }
        kept.push(class.as_str());
    }

    kept.reverse();
    kept.join(" ")
}
