use std::collections::BTreeMap;
use std::path::Path;

/// Metadata recoverable from the acquisition filename conventions.
///
/// Two generations of names are recognized:
/// * structured, underscore-separated:
///   `RuCl3_pu12mW_pr5mW_de50mW_temp4K_pupol45_prpol-45_001`
/// * legacy, dash- or space-separated:
///   `RuCl3-Pr-0.5mW-Pu-1.5mW-T-005.0k-1kAVG` and
///   `RuCl3- 2017-04-19 17.33.14 Pump1.5mW Temp7.0K`
///
/// Keys match the spellings the metadata store recognizes; values are the
/// bare numbers with their unit suffix stripped.
pub fn keyed_info(path: &Path) -> BTreeMap<String, String> {
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("");
    let structured = structured_info(stem);
    if !structured.is_empty() {
        return structured;
    }
    legacy_info(stem)
}

fn structured_info(stem: &str) -> BTreeMap<String, String> {
    let mut tokens = stem.split('_');
    let material = match tokens.next() {
        Some(first) if !first.is_empty() => first,
        _ => return BTreeMap::new(),
    };

    let mut info = BTreeMap::new();
    for token in tokens {
        let lower = token.to_ascii_lowercase();
        if let Some(rest) = lower.strip_prefix("pupol") {
            insert_number(&mut info, "Pump Polarization", rest);
        } else if let Some(rest) = lower.strip_prefix("prpol") {
            insert_number(&mut info, "Probe Polarization", rest);
        } else if let Some(rest) = lower.strip_prefix("depol") {
            insert_number(&mut info, "Destruction Polarization", rest);
        } else if let Some(rest) = lower.strip_prefix("temp") {
            insert_number(&mut info, "Temperature", rest.trim_end_matches('k'));
        } else if let Some(rest) = lower.strip_prefix("pu") {
            insert_number(&mut info, "Pump Power", rest.trim_end_matches("mw"));
        } else if let Some(rest) = lower.strip_prefix("pr") {
            insert_number(&mut info, "Probe Power", rest.trim_end_matches("mw"));
        } else if let Some(rest) = lower.strip_prefix("de") {
            insert_number(&mut info, "Destruction Power", rest.trim_end_matches("mw"));
        }
    }
    // A stem whose underscores tagged nothing is not the structured pattern.
    if info.is_empty() {
        return info;
    }
    info.insert("Material".to_string(), material.to_string());
    info
}

fn legacy_info(stem: &str) -> BTreeMap<String, String> {
    let mut info = BTreeMap::new();

    let material: String = stem
        .chars()
        .take_while(|c| *c != '-' && *c != ' ')
        .collect();
    if !material.is_empty() && material.parse::<f64>().is_err() {
        info.insert("Material".to_string(), material);
    }
    if let Some(date) = find_date(stem) {
        info.insert("Scan Date".to_string(), date);
    }

    let tokens: Vec<&str> = stem
        .split(|c: char| c == '-' || c == ' ')
        .filter(|token| !token.is_empty())
        .collect();
    let mut index = 0;
    while index < tokens.len() {
        let lower = tokens[index].to_ascii_lowercase();
        let next = tokens.get(index + 1).copied();
        let mut consumed_next = false;
        match lower.as_str() {
            "pu" | "pump" => {
                if let Some(value) = next.and_then(milliwatts) {
                    info.insert("Pump Power".to_string(), value);
                    consumed_next = true;
                }
            }
            "pr" | "probe" => {
                if let Some(value) = next.and_then(milliwatts) {
                    info.insert("Probe Power".to_string(), value);
                    consumed_next = true;
                }
            }
            "de" | "dest" => {
                if let Some(value) = next.and_then(milliwatts) {
                    info.insert("Destruction Power".to_string(), value);
                    consumed_next = true;
                }
            }
            "t" | "temp" => {
                if let Some(value) = next.and_then(kelvin) {
                    info.insert("Temperature".to_string(), value);
                    consumed_next = true;
                }
            }
            _ => {
                if let Some(value) = lower.strip_prefix("pump").and_then(milliwatts) {
                    info.insert("Pump Power".to_string(), value);
                } else if let Some(value) = lower.strip_prefix("probe").and_then(milliwatts) {
                    info.insert("Probe Power".to_string(), value);
                } else if let Some(value) = lower.strip_prefix("temp").and_then(kelvin) {
                    info.insert("Temperature".to_string(), value);
                }
            }
        }
        index += if consumed_next { 2 } else { 1 };
    }
    info
}

fn insert_number(info: &mut BTreeMap<String, String>, key: &str, digits: &str) {
    if let Ok(value) = digits.parse::<f64>() {
        info.insert(key.to_string(), value.to_string());
    }
}

/// Power token like `1.5mW`, returned as the bare number.
fn milliwatts(token: &str) -> Option<String> {
    let lower = token.to_ascii_lowercase();
    let digits = lower.strip_suffix("mw").unwrap_or(&lower);
    digits.parse::<f64>().ok().map(|value| value.to_string())
}

/// Temperature token like `7.0K` or `005.0k`.
fn kelvin(token: &str) -> Option<String> {
    let lower = token.to_ascii_lowercase();
    let digits = lower.strip_suffix('k').unwrap_or(&lower);
    digits.parse::<f64>().ok().map(|value| value.to_string())
}

/// Scan date in the `YYYY-MM-DD hh.mm.ss` form used by the acquisition
/// software.
fn find_date(stem: &str) -> Option<String> {
    const LEN: usize = 19;
    if stem.len() < LEN {
        return None;
    }
    for start in 0..=stem.len() - LEN {
        if !stem.is_char_boundary(start) || !stem.is_char_boundary(start + LEN) {
            continue;
        }
        let candidate = &stem[start..start + LEN];
        if is_date(candidate) {
            return Some(candidate.to_string());
        }
    }
    None
}

fn is_date(candidate: &str) -> bool {
    let bytes = candidate.as_bytes();
    let digits = [0, 1, 2, 3, 5, 6, 8, 9, 11, 12, 14, 15, 17, 18];
    let separators = [(4, b'-'), (7, b'-'), (10, b' '), (13, b'.'), (16, b'.')];
    digits.iter().all(|&i| bytes[i].is_ascii_digit())
        && separators.iter().all(|&(i, sep)| bytes[i] == sep)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn structured_stem_tags_every_channel() {
        let info = keyed_info(&PathBuf::from(
            "RuCl3_pu12mW_pr5mW_de50mW_temp4K_pupol45_prpol-45_001.mat",
        ));
        assert_eq!(info.get("Material").map(String::as_str), Some("RuCl3"));
        assert_eq!(info.get("Pump Power").map(String::as_str), Some("12"));
        assert_eq!(info.get("Probe Power").map(String::as_str), Some("5"));
        assert_eq!(info.get("Destruction Power").map(String::as_str), Some("50"));
        assert_eq!(info.get("Temperature").map(String::as_str), Some("4"));
        assert_eq!(info.get("Pump Polarization").map(String::as_str), Some("45"));
        assert_eq!(
            info.get("Probe Polarization").map(String::as_str),
            Some("-45")
        );
    }

    #[test]
    fn legacy_dashed_stem_is_recognized() {
        let info = keyed_info(&PathBuf::from("RuCl3-Pr-0.5mW-Pu-1.5mW-T-005.0k-1kAVG.mat"));
        assert_eq!(info.get("Material").map(String::as_str), Some("RuCl3"));
        assert_eq!(info.get("Probe Power").map(String::as_str), Some("0.5"));
        assert_eq!(info.get("Pump Power").map(String::as_str), Some("1.5"));
        assert_eq!(info.get("Temperature").map(String::as_str), Some("5"));
    }

    #[test]
    fn legacy_spaced_stem_carries_the_scan_date() {
        let info = keyed_info(&PathBuf::from(
            "RuCl3- 2017-04-19 17.33.14 Pump1.5mW Temp7.0K.txt",
        ));
        assert_eq!(info.get("Material").map(String::as_str), Some("RuCl3"));
        assert_eq!(
            info.get("Scan Date").map(String::as_str),
            Some("2017-04-19 17.33.14")
        );
        assert_eq!(info.get("Pump Power").map(String::as_str), Some("1.5"));
        assert_eq!(info.get("Temperature").map(String::as_str), Some("7"));
    }

    #[test]
    fn uninformative_stem_yields_only_the_material_guess() {
        let info = keyed_info(&PathBuf::from("scan007.mat"));
        assert_eq!(info.get("Material").map(String::as_str), Some("scan007"));
        assert_eq!(info.len(), 1);
    }
}
