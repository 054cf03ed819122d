//! JSON key → exported Go identifier.
use once_cell::sync::Lazy;
use regex::Regex;

/// Upper-case run followed by lower-case/digits, or a lower-case/digit run.
/// Everything in between (punctuation, whitespace) is a separator.
static WORD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\p{Lu}+[\p{Ll}\p{Lo}\p{Nd}]*|[\p{Ll}\p{Lo}\p{Nd}]+").expect("static word regex")
});

const INITIALISMS: &[&str] = &[
    "ACL", "API", "ASCII", "CPU", "CSS", "DNS", "EOF", "GUID", "HTML", "HTTP", "HTTPS", "ID",
    "IP", "JSON", "LHS", "QPS", "RAM", "RHS", "RPC", "SLA", "SMTP", "SQL", "SSH", "TCP", "TLS",
    "TTL", "UDP", "UI", "UID", "URI", "URL", "UTC", "UTF8", "UUID", "VM", "XML", "XMPP", "XSRF",
    "XSS",
];

/// `user_id` → `UserID`, `createdAt` → `CreatedAt`, `2fa` → `X2fa`.
pub fn go_name(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for word in WORD.find_iter(key).map(|m| m.as_str()) {
        let upper = word.to_uppercase();
        if INITIALISMS.contains(&upper.as_str()) {
            out.push_str(&upper);
            continue;
        }
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    }

    match out.chars().next() {
        None => "Field".to_string(),
        Some(c) if c.is_uppercase() => out,
        Some(_) => format!("X{out}"),
    }
}

/// `base`, or `base2`, `base3`, … whichever is not taken yet.
pub fn unique_name(base: String, taken: impl Fn(&str) -> bool) -> String {
    if !taken(&base) {
        return base;
    }
    let mut i = 2u32;
    loop {
        let candidate = format!("{base}{i}");
        if !taken(&candidate) {
            return candidate;
        }
        i += 1;
    }
}
