//! Minimal line-oriented vCard / iCalendar reader.
//!
//! Only what the store indexes is understood: the outer component, `UID`
//! and the vCard properties mapped onto [`ItemFields`]. Everything else is
//! carried through untouched as part of the raw payload.

use davstore_core::error::AppError;
use davstore_core::result::AppResult;
use davstore_entity::item::{ItemFields, ItemKind};

use super::{ItemParser, ParsedItem};

/// One unfolded content line.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ContentLine<'a> {
    /// Upper-cased property name without group prefix.
    name: String,
    /// Raw value after the first unquoted colon.
    value: &'a str,
}

/// Parser for `BEGIN:VCARD` and `BEGIN:VCALENDAR` payloads.
#[derive(Debug, Clone, Copy, Default)]
pub struct VObjectParser;

impl VObjectParser {
    /// Create a parser.
    pub fn new() -> Self {
        Self
    }
}

impl ItemParser for VObjectParser {
    fn parse(&self, text: &str) -> AppResult<ParsedItem> {
        let lines = unfold(text);
        let kind = detect_kind(&lines)?;

        let mut uid = None;
        let mut fields = ItemFields::default();
        let mut depth = 0usize;

        for raw in &lines {
            let Some(line) = parse_line(raw) else {
                continue;
            };
            match line.name.as_str() {
                "BEGIN" => {
                    depth += 1;
                    continue;
                }
                "END" => {
                    depth = depth.saturating_sub(1);
                    continue;
                }
                _ => {}
            }

            if line.name == "UID" && uid.is_none() {
                // vCard UID lives on the card itself; iCalendar UIDs on the
                // first nested component.
                let wanted = match kind {
                    ItemKind::VCard => depth == 1,
                    ItemKind::VCalendar => depth >= 2,
                };
                if wanted {
                    uid = Some(unescape(line.value.trim()));
                }
            }

            if kind == ItemKind::VCard && depth == 1 {
                apply_vcard_field(&mut fields, &line);
            }
        }

        Ok(ParsedItem {
            kind,
            uid: uid.filter(|u| !u.is_empty()),
            fields: fields.normalized(),
        })
    }

    fn with_uid(&self, text: &str, uid: &str) -> AppResult<String> {
        let lines = unfold(text);
        if detect_kind(&lines)? != ItemKind::VCard {
            return Ok(text.to_string());
        }

        let mut out: Vec<String> = Vec::with_capacity(lines.len() + 1);
        let mut depth = 0usize;
        let mut replaced = false;
        for raw in lines {
            let name = parse_line(&raw).map(|l| l.name);
            match name.as_deref() {
                Some("BEGIN") => depth += 1,
                Some("END") => {
                    if depth == 1 && !replaced {
                        out.push(format!("UID:{uid}"));
                        replaced = true;
                    }
                    depth = depth.saturating_sub(1);
                }
                Some("UID") if depth == 1 => {
                    if !replaced {
                        out.push(format!("UID:{uid}"));
                        replaced = true;
                    }
                    continue;
                }
                _ => {}
            }
            out.push(raw);
        }

        let mut serialized = out.join("\r\n");
        serialized.push_str("\r\n");
        Ok(serialized)
    }
}

/// Split into lines and join RFC 5545/6350 folded continuations.
fn unfold(text: &str) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    for line in text.split('\n') {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if let Some(continuation) = line.strip_prefix([' ', '\t']) {
            if let Some(last) = lines.last_mut() {
                last.push_str(continuation);
                continue;
            }
        }
        if !line.is_empty() {
            lines.push(line.to_string());
        }
    }
    lines
}

fn detect_kind(lines: &[String]) -> AppResult<ItemKind> {
    let first = lines
        .first()
        .and_then(|l| parse_line(l))
        .filter(|l| l.name == "BEGIN")
        .map(|l| l.value.trim().to_ascii_uppercase());
    match first.as_deref() {
        Some("VCARD") => Ok(ItemKind::VCard),
        Some("VCALENDAR") => Ok(ItemKind::VCalendar),
        _ => Err(AppError::validation("Unsupported item format")),
    }
}

/// Split `NAME;PARAM=x:value`. Colons inside quoted parameter values do not
/// terminate the name part.
fn parse_line(line: &str) -> Option<ContentLine<'_>> {
    let mut in_quotes = false;
    let mut colon = None;
    for (i, c) in line.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            ':' if !in_quotes => {
                colon = Some(i);
                break;
            }
            _ => {}
        }
    }
    let colon = colon?;
    let head = &line[..colon];
    let name = head.split(';').next().unwrap_or(head);
    let name = name.rsplit('.').next().unwrap_or(name);
    Some(ContentLine {
        name: name.trim().to_ascii_uppercase(),
        value: &line[colon + 1..],
    })
}

fn apply_vcard_field(fields: &mut ItemFields, line: &ContentLine<'_>) {
    match line.name.as_str() {
        "FN" if fields.full_name.is_none() => fields.full_name = Some(unescape(line.value)),
        "N" if fields.last_name.is_none() && fields.first_name.is_none() => {
            let mut parts = split_unescaped(line.value, ';').into_iter();
            fields.last_name = parts.next();
            fields.first_name = parts.next();
            fields.middle_name = parts.next();
            fields.prefix = parts.next();
            fields.suffix = parts.next();
        }
        "TEL" if fields.phone_number.is_none() => {
            let value = line.value;
            fields.phone_number = value.split(';').next().map(str::to_string);
            if let Some((_, ext)) = value.split_once("ext=") {
                fields.ext_number = Some(ext.to_string());
            }
        }
        "ORG" if fields.company.is_none() => {
            let mut parts = split_unescaped(line.value, ';').into_iter();
            fields.company = parts.next();
            fields.department = parts.next();
        }
        "TITLE" if fields.title.is_none() => fields.title = Some(unescape(line.value)),
        "CATEGORIES" if fields.categories.is_empty() => {
            fields.categories = split_unescaped(line.value, ',')
                .into_iter()
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty())
                .collect();
        }
        _ => {}
    }
}

fn unescape(value: &str) -> String {
    split_unescaped(value, '\0').into_iter().next().unwrap_or_default()
}

/// Split on `sep`, honouring backslash escapes.
fn split_unescaped(value: &str, sep: char) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some('n' | 'N') => current.push('\n'),
                Some(other) => current.push(other),
                None => current.push('\\'),
            },
            c if c == sep => parts.push(std::mem::take(&mut current)),
            c => current.push(c),
        }
    }
    parts.push(current);
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    const CARD: &str = "BEGIN:VCARD\r\n\
        VERSION:3.0\r\n\
        UID:alice-1\r\n\
        FN:Alice Doe\r\n\
        N:Doe;Alice;Marie;Dr.;PhD\r\n\
        item1.TEL;TYPE=work:+82 2 555 0100;ext=42\r\n\
        ORG:Example Corp;Research\\, Seoul\r\n\
        TITLE:Princi\r\n pal\r\n\
        CATEGORIES:friends, work\r\n\
        END:VCARD\r\n";

    const EVENT: &str = "BEGIN:VCALENDAR\r\n\
        VERSION:2.0\r\n\
        BEGIN:VEVENT\r\n\
        UID:meeting-42\r\n\
        SUMMARY:Sync\r\n\
        END:VEVENT\r\n\
        END:VCALENDAR\r\n";

    #[test]
    fn test_vcard_fields() {
        let parsed = VObjectParser.parse(CARD).unwrap();
        assert_eq!(parsed.kind, ItemKind::VCard);
        assert_eq!(parsed.uid.as_deref(), Some("alice-1"));

        let f = parsed.fields;
        assert_eq!(f.full_name.as_deref(), Some("Alice Doe"));
        assert_eq!(f.last_name.as_deref(), Some("Doe"));
        assert_eq!(f.first_name.as_deref(), Some("Alice"));
        assert_eq!(f.middle_name.as_deref(), Some("Marie"));
        assert_eq!(f.prefix.as_deref(), Some("Dr."));
        assert_eq!(f.suffix.as_deref(), Some("PhD"));
        assert_eq!(f.phone_number.as_deref(), Some("+82 2 555 0100"));
        assert_eq!(f.ext_number.as_deref(), Some("42"));
        assert_eq!(f.company.as_deref(), Some("Example Corp"));
        assert_eq!(f.department.as_deref(), Some("Research, Seoul"));
        assert_eq!(f.title.as_deref(), Some("Principal"));
        assert_eq!(f.categories, vec!["friends".to_string(), "work".to_string()]);
    }

    #[test]
    fn test_calendar_uid_from_component() {
        let parsed = VObjectParser.parse(EVENT).unwrap();
        assert_eq!(parsed.kind, ItemKind::VCalendar);
        assert_eq!(parsed.uid.as_deref(), Some("meeting-42"));
        assert_eq!(parsed.fields, ItemFields::default());
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        assert!(VObjectParser.parse("hello").is_err());
        assert!(VObjectParser.parse("").is_err());
    }

    #[test]
    fn test_with_uid_replaces_existing() {
        let rewritten = VObjectParser.with_uid(CARD, "11111111-1111-1111-1111-111111111111").unwrap();
        let parsed = VObjectParser.parse(&rewritten).unwrap();
        assert_eq!(parsed.uid.as_deref(), Some("11111111-1111-1111-1111-111111111111"));
        assert_eq!(rewritten.matches("UID:").count(), 1);
        assert!(rewritten.ends_with("END:VCARD\r\n"));
    }

    #[test]
    fn test_with_uid_inserts_when_missing() {
        let card = "BEGIN:VCARD\nVERSION:3.0\nFN:Bob\nEND:VCARD\n";
        let rewritten = VObjectParser.with_uid(card, "abc").unwrap();
        assert_eq!(
            rewritten,
            "BEGIN:VCARD\r\nVERSION:3.0\r\nFN:Bob\r\nUID:abc\r\nEND:VCARD\r\n"
        );
    }

    #[test]
    fn test_with_uid_leaves_calendars_alone() {
        assert_eq!(VObjectParser.with_uid(EVENT, "x").unwrap(), EVENT);
    }

    #[test]
    fn test_quoted_colon_in_parameter() {
        let line = parse_line(r#"ATTENDEE;CN="Doe: Jane":mailto:jane@example.com"#).unwrap();
        assert_eq!(line.name, "ATTENDEE");
        assert_eq!(line.value, "mailto:jane@example.com");
    }
}
