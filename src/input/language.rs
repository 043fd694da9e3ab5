//! Language detection for translation file names.

use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;

/// Locale codes that appear in Qt translation file names.
///
/// Based on the locales shipped by Qt and desktop environments built on it.
static LANGUAGE_CODES: LazyLock<HashSet<String>> = LazyLock::new(|| {
    "af am ar ar_EG ast az be bg bn bo br bs ca ca_ES cs cy da de de_AT de_CH de_DE dz el en \
     en_AU en_CA en_GB en_US eo es es_419 es_AR es_ES es_MX et eu fa fi fil fr fr_CA fr_FR ga \
     gl gl_ES gu he hi hi_IN hr hu hy id is it it_IT ja jv ka kab kk km km_KH kn kn_IN ko ku \
     ku_IQ ky lo lt lv mk ml mn mr ms my nb ne nl nl_BE nn oc pa pl pl_PL ps pt pt_BR pt_PT ro \
     ru ru_RU si sk sl sq sr sr_RS sv sv_SE sw ta te tg th tl tr tzm ug uk ur uz vi zh zh_CN \
     zh_HK zh_SG zh_TW"
        .split_whitespace()
        .map(normalize_language_code)
        .collect()
});

/// Normalize language code (lowercase and replace - with _)
#[must_use]
pub fn normalize_language_code(code: &str) -> String {
    code.to_lowercase().replace('-', "_")
}

/// Returns true if `candidate` names a known locale.
#[must_use]
pub fn is_language_code(candidate: &str) -> bool {
    !candidate.is_empty() && LANGUAGE_CODES.contains(&normalize_language_code(candidate))
}

/// Language code carried by a name like `app_pl`, `app_zh_CN` or `pl_PL`.
fn language_suffix(name: &str) -> Option<&str> {
    if is_language_code(name) {
        return Some(name);
    }
    let parts: Vec<(usize, &str)> = name.match_indices('_').collect();

    // `_zh_CN` form: the code spans the last two underscore-separated parts
    if let [.., (start, _), _] = parts.as_slice() {
        let candidate = name.get(start + 1..)?;
        if is_language_code(candidate) {
            return Some(candidate);
        }
    }
    if let [.., (start, _)] = parts.as_slice() {
        let candidate = name.get(start + 1..)?;
        if is_language_code(candidate) {
            return Some(candidate);
        }
    }
    None
}

/// Detect language from a translation file path.
///
/// The file stem wins (`dde-file-manager_pl.ts` → `pl`, `app_zh_CN.ts` → `zh_CN`);
/// otherwise directory names are searched from the innermost outwards
/// (`translations/pl/app.ts` → `pl`).
#[must_use]
pub fn detect_language_from_path(file_path: &Path) -> Option<String> {
    if let Some(stem) = file_path.file_stem().and_then(|s| s.to_str())
        && let Some(code) = language_suffix(stem)
    {
        return Some(code.to_string());
    }

    file_path
        .parent()?
        .components()
        .rev()
        .filter_map(|component| component.as_os_str().to_str())
        .find(|part| is_language_code(part))
        .map(str::to_string)
}
