//! Public page rendering — the read-only view of the site in one language.

use serde::Serialize;

use crate::models::{ContactEntry, ContentMap, Experience, Language, SUPPORTED_LANGUAGES};

/// Display order of non-phone contacts; unknown types go last.
const LINK_ORDER: &[&str] = &["calendly", "linkedin", "email"];

#[derive(Debug, Clone, Serialize)]
pub struct LanguageOption {
    pub code: &'static str,
    pub label: &'static str,
}

/// Choices offered on the first-visit language splash.
#[derive(Debug, Clone, Serialize)]
pub struct LanguageSplash {
    pub default: Language,
    pub options: Vec<LanguageOption>,
}

pub fn language_splash() -> LanguageSplash {
    LanguageSplash {
        default: Language::default(),
        options: SUPPORTED_LANGUAGES
            .iter()
            .map(|lang| LanguageOption {
                code: lang.code(),
                label: lang.native_name(),
            })
            .collect(),
    }
}

/// Who the résumé belongs to, shown in the page header.
#[derive(Debug, Clone)]
pub struct SiteProfile {
    pub name: String,
    pub subtitle: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PublicExperience {
    pub id: i64,
    pub title: String,
    pub company: String,
    pub period: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CallAction {
    pub label: &'static str,
    pub href: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContactLink {
    #[serde(rename = "type")]
    pub kind: String,
    pub label: String,
    pub href: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Section<T> {
    pub heading: String,
    pub items: Vec<T>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContactSection {
    pub heading: &'static str,
    pub calls: Vec<CallAction>,
    pub links: Vec<ContactLink>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PublicPage {
    pub language: Language,
    pub name: String,
    pub subtitle: String,
    pub intro: String,
    pub experience: Section<PublicExperience>,
    pub characteristics: Section<&'static str>,
    pub languages: Section<&'static str>,
    pub contact: ContactSection,
}

struct Labels {
    characteristics: &'static str,
    languages: &'static str,
    contact: &'static str,
    call: &'static str,
    characteristics_list: &'static [&'static str],
    languages_list: &'static [&'static str],
}

fn labels(language: Language) -> Labels {
    match language {
        Language::Nl => Labels {
            characteristics: "Persoonlijke kenmerken",
            languages: "Talen",
            contact: "Contact",
            call: "Bel mij",
            characteristics_list: &["Enthousiast", "Sociaal", "Leergierig"],
            languages_list: &["Nederlands", "Engels"],
        },
        Language::En => Labels {
            characteristics: "Personal Characteristics",
            languages: "Languages",
            contact: "Contact",
            call: "Call me",
            characteristics_list: &["Enthusiastic", "Social", "Eager to learn"],
            languages_list: &["Dutch", "English"],
        },
    }
}

fn content_text(content: &ContentMap, key: &str, language: Language) -> String {
    content
        .get(key)
        .map(|field| field.text(language).to_string())
        .unwrap_or_default()
}

fn link_rank(kind: &str) -> usize {
    LINK_ORDER
        .iter()
        .position(|k| *k == kind)
        .unwrap_or(LINK_ORDER.len())
}

fn contact_href(contact: &ContactEntry) -> String {
    match contact.kind.as_str() {
        "email" => format!("mailto:{}", contact.value),
        _ => contact.value.clone(),
    }
}

pub fn render_public_page(
    profile: &SiteProfile,
    language: Language,
    content: &ContentMap,
    experiences: &[Experience],
    contacts: &[ContactEntry],
) -> PublicPage {
    let labels = labels(language);

    let experience_items = experiences
        .iter()
        .map(|exp| PublicExperience {
            id: exp.id,
            title: exp.title.text(language).to_string(),
            company: exp.company.text(language).to_string(),
            period: exp.period.text(language).to_string(),
            description: exp.description.text(language).to_string(),
        })
        .collect();

    let calls = contacts
        .iter()
        .filter(|c| c.kind == "phone")
        .map(|c| CallAction {
            label: labels.call,
            href: format!("tel:{}", c.value),
        })
        .collect();

    let mut others: Vec<&ContactEntry> = contacts.iter().filter(|c| c.kind != "phone").collect();
    others.sort_by_key(|c| link_rank(&c.kind));
    let links = others
        .into_iter()
        .map(|c| ContactLink {
            kind: c.kind.clone(),
            label: c.label.clone(),
            href: contact_href(c),
        })
        .collect();

    PublicPage {
        language,
        name: profile.name.clone(),
        subtitle: profile.subtitle.clone(),
        intro: content_text(content, "intro", language),
        experience: Section {
            heading: content_text(content, "experience", language),
            items: experience_items,
        },
        characteristics: Section {
            heading: labels.characteristics.to_string(),
            items: labels.characteristics_list.to_vec(),
        },
        languages: Section {
            heading: labels.languages.to_string(),
            items: labels.languages_list.to_vec(),
        },
        contact: ContactSection {
            heading: labels.contact,
            calls,
            links,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{content_map_from_rows, ContentRow, LocalizedField};

    fn contact(id: i64, kind: &str, value: &str) -> ContactEntry {
        ContactEntry {
            id,
            kind: kind.to_string(),
            value: value.to_string(),
            label: kind.to_uppercase(),
        }
    }

    fn profile() -> SiteProfile {
        SiteProfile {
            name: "Jan Jansen".to_string(),
            subtitle: "Software Engineer".to_string(),
        }
    }

    fn content() -> ContentMap {
        content_map_from_rows(vec![
            ContentRow {
                key: "intro".to_string(),
                language: "nl".to_string(),
                value: "Hoi".to_string(),
            },
            ContentRow {
                key: "experience".to_string(),
                language: "en".to_string(),
                value: "Experience".to_string(),
            },
        ])
    }

    #[test]
    fn test_missing_translations_render_empty() {
        let exp = Experience {
            id: 1,
            title: [("nl", "Kok")].into_iter().collect(),
            company: LocalizedField::default(),
            period: LocalizedField::default(),
            description: LocalizedField::default(),
            order_index: 0,
        };
        let page = render_public_page(&profile(), Language::En, &content(), &[exp], &[]);
        assert_eq!(page.intro, "");
        assert_eq!(page.experience.heading, "Experience");
        assert_eq!(page.experience.items[0].title, "");

        let page = render_public_page(&profile(), Language::Nl, &content(), &[], &[]);
        assert_eq!(page.intro, "Hoi");
        assert_eq!(page.name, "Jan Jansen");
        assert_eq!(page.experience.heading, "");
    }

    #[test]
    fn test_contacts_split_and_ordered() {
        let contacts = vec![
            contact(1, "email", "jan@example.com"),
            contact(2, "phone", "+31600000000"),
            contact(3, "github", "https://github.com/jan"),
            contact(4, "linkedin", "https://linkedin.com/in/jan"),
            contact(5, "calendly", "https://calendly.com/jan"),
        ];
        let page = render_public_page(&profile(), Language::Nl, &ContentMap::new(), &[], &contacts);

        assert_eq!(page.contact.calls.len(), 1);
        assert_eq!(page.contact.calls[0].href, "tel:+31600000000");
        assert_eq!(page.contact.calls[0].label, "Bel mij");

        let kinds: Vec<&str> = page.contact.links.iter().map(|l| l.kind.as_str()).collect();
        assert_eq!(kinds, vec!["calendly", "linkedin", "email", "github"]);
        assert_eq!(page.contact.links[2].href, "mailto:jan@example.com");
    }

    #[test]
    fn test_labels_follow_language() {
        let page = render_public_page(&profile(), Language::En, &ContentMap::new(), &[], &[]);
        assert_eq!(page.characteristics.heading, "Personal Characteristics");
        assert_eq!(page.languages.items, vec!["Dutch", "English"]);
    }

    #[test]
    fn test_splash_lists_supported_languages() {
        let splash = language_splash();
        assert_eq!(splash.default, Language::Nl);
        let codes: Vec<&str> = splash.options.iter().map(|o| o.code).collect();
        assert_eq!(codes, vec!["nl", "en"]);
    }
}
