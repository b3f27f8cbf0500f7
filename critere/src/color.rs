//! Conversion de couleurs hexadécimales en `rgba()`

use std::sync::OnceLock;

use regex::Regex;

use crate::CritereError;

fn hex_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new("^#([A-Fa-f0-9]{3}){1,2}$").expect("pattern littéral valide"))
}

/// Vérifie qu'une chaîne est une couleur hexadécimale valide (3 ou 6 chiffres, préfixe `#`)
pub fn is_valid_hex(hex: &str) -> bool {
    hex_pattern().is_match(hex)
}

/// Convertit `#RGB` ou `#RRGGBB` en chaîne `rgba(r,g,b,opacité)`.
///
/// Le raccourci 3 chiffres est étendu en doublant chaque chiffre.
///
/// # Errors
///
/// Retourne `CritereError::InvalidColorFormat` pour toute entrée qui
/// n'est pas une couleur hexadécimale 3 ou 6 chiffres préfixée de `#`.
pub fn hex_to_rgba(hex: &str, opacity: f64) -> Result<String, CritereError> {
    if !is_valid_hex(hex) {
        return Err(CritereError::InvalidColorFormat(hex.to_string()));
    }

    let digits = &hex[1..];
    let expanded: String = if digits.len() == 3 {
        digits.chars().flat_map(|c| [c, c]).collect()
    } else {
        digits.to_string()
    };

    // La regex garantit exactement 6 chiffres hexadécimaux à ce point
    let value = u32::from_str_radix(&expanded, 16)
        .map_err(|_| CritereError::InvalidColorFormat(hex.to_string()))?;

    let r = (value >> 16) & 255;
    let g = (value >> 8) & 255;
    let b = value & 255;

    Ok(format!("rgba({},{},{},{})", r, g, b, opacity))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_to_rgba_six_digits() {
        assert_eq!(hex_to_rgba("#3388ff", 0.2).unwrap(), "rgba(51,136,255,0.2)");
        assert_eq!(hex_to_rgba("#FF0000", 1.0).unwrap(), "rgba(255,0,0,1)");
        assert_eq!(hex_to_rgba("#000000", 0.5).unwrap(), "rgba(0,0,0,0.5)");
    }

    #[test]
    fn test_hex_to_rgba_three_digits() {
        assert_eq!(hex_to_rgba("#fff", 1.0).unwrap(), "rgba(255,255,255,1)");
        assert_eq!(hex_to_rgba("#f80", 0.8).unwrap(), "rgba(255,136,0,0.8)");
    }

    #[test]
    fn test_hex_to_rgba_invalid() {
        for bad in ["3388ff", "#33", "#12345", "#gggggg", "", "#", "rgba(0,0,0,1)"] {
            assert!(
                matches!(
                    hex_to_rgba(bad, 1.0),
                    Err(CritereError::InvalidColorFormat(_))
                ),
                "'{}' aurait dû être rejeté",
                bad
            );
        }
    }

    #[test]
    fn test_is_valid_hex() {
        assert!(is_valid_hex("#a9a9a9"));
        assert!(is_valid_hex("#ABC"));
        assert!(!is_valid_hex("a9a9a9"));
        assert!(!is_valid_hex("#a9a9a"));
    }
}
