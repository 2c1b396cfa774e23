//! Document title composition from a breadcrumb trail.

use crate::breadcrumbs::BreadcrumbItem;

/// Options for [`title_list`].
#[derive(Clone, Debug, Default)]
pub struct TitleListOptions {
    /// Separator between titles (default `" | "`).
    pub separator: Option<String>,
    /// Items linking here are left out (default `/`).
    pub base_url: Option<String>,
    /// Prepended to the result.
    pub prefix: Option<String>,
    /// Appended as a final segment (default: site name).
    pub suffix: Option<String>,
    /// Site name, used as default suffix and fallback.
    pub site_name: Option<String>,
    /// Used when no titles remain (default: site name).
    pub fallback: Option<String>,
}

/// Compose a document title from breadcrumbs, innermost page first.
///
/// `[Home, About, Team]` with site name "Acme" becomes `"Team | About | Acme"`.
/// The suffix is its own segment and is only added when at least one page
/// title remains; otherwise the result is the fallback alone. It is never
/// glued onto the last title, so `"About"` plus suffix `"Acme"` gives
/// `"About | Acme"` and not `"AboutAcme"`.
#[must_use]
pub fn title_list(breadcrumbs: &[BreadcrumbItem], options: &TitleListOptions) -> String {
    let separator = options.separator.as_deref().unwrap_or(" | ");
    let base_url = options.base_url.as_deref().unwrap_or("/");
    let site_name = options.site_name.as_deref();
    let suffix = options.suffix.as_deref().or(site_name).map(str::trim);
    let fallback = options.fallback.as_deref().or(site_name).map(str::trim);

    let mut titles: Vec<&str> = breadcrumbs
        .iter()
        .rev()
        .filter(|item| item.href != base_url && item.href != "/")
        .filter_map(|item| item.title.as_deref().map(str::trim))
        .collect();

    if titles.is_empty() {
        if let Some(fallback) = fallback.filter(|f| !f.is_empty()) {
            titles.push(fallback);
        }
    } else if let Some(suffix) = suffix.filter(|s| !s.is_empty()) {
        titles.push(suffix);
    }

    let mut title = titles.join(separator);
    let prefix = options.prefix.as_deref().map(str::trim);
    if let Some(prefix) = prefix.filter(|p| !p.is_empty()) {
        title.insert_str(0, prefix);
    }
    title
}
