use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::store::{ContentError, Record};

/// Table names on the hosted backend.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Projects,
    BlogPosts,
    SiteSettings,
}

impl Collection {
    pub const ALL: [Collection; 3] = [
        Collection::Projects,
        Collection::BlogPosts,
        Collection::SiteSettings,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Collection::Projects => "projects",
            Collection::BlogPosts => "blog_posts",
            Collection::SiteSettings => "site_settings",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Collection {
    type Err = ContentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Collection::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ContentError::UnknownCollection(s.to_string()))
    }
}

// Row ids come back as integers or uuids depending on the table definition.
fn record_id<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(serde_json::Number),
    }
    Ok(match RawId::deserialize(d)? {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    })
}

fn optional_record_id<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    let raw = Option::<Value>::deserialize(d)?;
    Ok(match raw {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Nullable columns decode to the field's default.
fn null_default<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(d)?.unwrap_or_default())
}

pub fn decode<T: DeserializeOwned>(record: Record) -> Result<T, ContentError> {
    serde_json::from_value(Value::Object(record)).map_err(|e| ContentError::Decode(e.to_string()))
}

pub fn encode<T: Serialize>(value: &T) -> Result<Record, ContentError> {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(ContentError::Decode(format!("expected an object, got {other}"))),
        Err(e) => Err(ContentError::Decode(e.to_string())),
    }
}

/// A record ready for `insert`: an empty id is left for the backend to assign.
pub fn draft_record<T: Serialize>(value: &T) -> Result<Record, ContentError> {
    let mut record = encode(value)?;
    if record.get("id").and_then(Value::as_str) == Some("") {
        record.remove("id");
    }
    Ok(record)
}

/// A record ready for `update`: identity and server timestamps are not patched.
pub fn patch_record<T: Serialize>(value: &T) -> Result<Record, ContentError> {
    let mut record = encode(value)?;
    record.remove("id");
    record.remove("created_at");
    Ok(record)
}

/// A row type living in its own collection, addressed by id.
pub trait Entry: Serialize + DeserializeOwned + Clone {
    const COLLECTION: Collection;

    fn id(&self) -> &str;

    /// Image URL fields, mutable so legacy inline images can be replaced.
    fn images_mut(&mut self) -> Vec<&mut String>;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(deserialize_with = "record_id")]
    pub id: String,
    pub title: String,
    #[serde(default, deserialize_with = "null_default")]
    pub category: String,
    #[serde(default, deserialize_with = "null_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_default")]
    pub cover_image: String,
    #[serde(default, deserialize_with = "null_default")]
    pub gallery: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub featured: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Entry for Project {
    const COLLECTION: Collection = Collection::Projects;

    fn id(&self) -> &str {
        &self.id
    }

    fn images_mut(&mut self) -> Vec<&mut String> {
        let mut out = vec![&mut self.cover_image];
        out.extend(self.gallery.iter_mut());
        out
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlogPost {
    #[serde(deserialize_with = "record_id")]
    pub id: String,
    pub title: String,
    #[serde(default, deserialize_with = "null_default")]
    pub excerpt: String,
    /// Editor HTML, stored as-is.
    #[serde(default, deserialize_with = "null_default")]
    pub content: String,
    #[serde(default, deserialize_with = "null_default")]
    pub cover_image: String,
    #[serde(default, deserialize_with = "null_default")]
    pub author: String,
    #[serde(default, deserialize_with = "null_default")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub views: u64,
    #[serde(default, deserialize_with = "null_default")]
    pub published: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Entry for BlogPost {
    const COLLECTION: Collection = Collection::BlogPosts;

    fn id(&self) -> &str {
        &self.id
    }

    fn images_mut(&mut self) -> Vec<&mut String> {
        vec![&mut self.cover_image]
    }
}

/// Distinct project categories in first-seen order.
pub fn categories(projects: &[Project]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for p in projects {
        if !p.category.is_empty() && !out.contains(&p.category) {
            out.push(p.category.clone());
        }
    }
    out
}

/// Published posts, newest first. Posts without a timestamp sort last.
pub fn published_posts(posts: &[BlogPost]) -> Vec<&BlogPost> {
    let mut out: Vec<&BlogPost> = posts.iter().filter(|p| p.published).collect();
    out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    out
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeroSettings {
    pub headline: String,
    pub subheadline: String,
    pub roles: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AboutSettings {
    pub text: String,
    pub portrait: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactSettings {
    pub email: String,
    pub phone: String,
    pub location: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLinks {
    pub instagram: String,
    pub behance: String,
    pub dribbble: String,
    pub linkedin: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceItem {
    #[serde(default, deserialize_with = "null_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_default")]
    pub image: String,
}

/// Settings in the shape the views consume.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SiteSettings {
    pub hero: HeroSettings,
    pub about: AboutSettings,
    pub contact: ContactSettings,
    pub social: SocialLinks,
    pub services: Vec<ServiceItem>,
}

impl SiteSettings {
    pub fn images_mut(&mut self) -> Vec<&mut String> {
        let mut out = vec![&mut self.about.portrait];
        out.extend(self.services.iter_mut().map(|s| &mut s.image));
        out
    }
}

/// The single settings row as stored: one column per field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsRecord {
    #[serde(
        default,
        deserialize_with = "optional_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub hero_headline: String,
    #[serde(default, deserialize_with = "null_default")]
    pub hero_subheadline: String,
    #[serde(default, deserialize_with = "null_default")]
    pub hero_roles: Vec<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub about_text: String,
    #[serde(default, deserialize_with = "null_default")]
    pub about_image: String,
    #[serde(default, deserialize_with = "null_default")]
    pub contact_email: String,
    #[serde(default, deserialize_with = "null_default")]
    pub contact_phone: String,
    #[serde(default, deserialize_with = "null_default")]
    pub contact_location: String,
    #[serde(default, deserialize_with = "null_default")]
    pub social_instagram: String,
    #[serde(default, deserialize_with = "null_default")]
    pub social_behance: String,
    #[serde(default, deserialize_with = "null_default")]
    pub social_dribbble: String,
    #[serde(default, deserialize_with = "null_default")]
    pub social_linkedin: String,
    #[serde(default, deserialize_with = "null_default")]
    pub services: Vec<ServiceItem>,
}

impl SettingsRecord {
    pub fn from_settings(id: Option<String>, s: &SiteSettings) -> Self {
        Self {
            id,
            hero_headline: s.hero.headline.clone(),
            hero_subheadline: s.hero.subheadline.clone(),
            hero_roles: s.hero.roles.clone(),
            about_text: s.about.text.clone(),
            about_image: s.about.portrait.clone(),
            contact_email: s.contact.email.clone(),
            contact_phone: s.contact.phone.clone(),
            contact_location: s.contact.location.clone(),
            social_instagram: s.social.instagram.clone(),
            social_behance: s.social.behance.clone(),
            social_dribbble: s.social.dribbble.clone(),
            social_linkedin: s.social.linkedin.clone(),
            services: s.services.clone(),
        }
    }
}

impl From<SettingsRecord> for SiteSettings {
    fn from(r: SettingsRecord) -> Self {
        Self {
            hero: HeroSettings {
                headline: r.hero_headline,
                subheadline: r.hero_subheadline,
                roles: r.hero_roles,
            },
            about: AboutSettings {
                text: r.about_text,
                portrait: r.about_image,
            },
            contact: ContactSettings {
                email: r.contact_email,
                phone: r.contact_phone,
                location: r.contact_location,
            },
            social: SocialLinks {
                instagram: r.social_instagram,
                behance: r.social_behance,
                dribbble: r.social_dribbble,
                linkedin: r.social_linkedin,
            },
            services: r.services,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn record(v: Value) -> Record {
        match v {
            Value::Object(m) => m,
            _ => unreachable!(),
        }
    }

    #[test]
    fn collection_names_parse() {
        for c in Collection::ALL {
            assert_eq!(c.as_str().parse::<Collection>().unwrap(), c);
        }
        assert!(matches!(
            "users".parse::<Collection>(),
            Err(ContentError::UnknownCollection(_))
        ));
    }

    #[test]
    fn project_decodes_backend_row_with_nulls() {
        let row = record(json!({
            "id": 7,
            "title": "Brand refresh",
            "category": "Branding",
            "description": null,
            "cover_image": "https://cdn/x.jpg",
            "gallery": null,
            "tags": ["identity"],
            "featured": true,
            "created_at": "2024-03-01T10:00:00Z"
        }));
        let p: Project = decode(row).unwrap();
        assert_eq!(p.id, "7");
        assert_eq!(p.description, "");
        assert!(p.gallery.is_empty());
        assert_eq!(p.year, None);
        assert!(p.featured);
    }

    #[test]
    fn missing_title_is_a_decode_error() {
        let row = record(json!({ "id": "a" }));
        assert!(matches!(decode::<BlogPost>(row), Err(ContentError::Decode(_))));
    }

    #[test]
    fn draft_drops_empty_id_and_patch_drops_identity() {
        let mut post = BlogPost {
            title: "Hello".into(),
            ..Default::default()
        };
        let draft = draft_record(&post).unwrap();
        assert!(!draft.contains_key("id"));
        assert!(!draft.contains_key("created_at"));

        post.id = "3".into();
        post.created_at = Some("2024-01-01".into());
        let patch = patch_record(&post).unwrap();
        assert!(!patch.contains_key("id"));
        assert!(!patch.contains_key("created_at"));
        assert_eq!(patch["title"], json!("Hello"));
    }

    #[test]
    fn settings_flatten_and_nest() {
        let settings = SiteSettings {
            hero: HeroSettings {
                headline: "Design that moves".into(),
                subheadline: "Studio".into(),
                roles: vec!["Designer".into(), "Art Director".into()],
            },
            about: AboutSettings {
                text: "About me".into(),
                portrait: "https://cdn/me.jpg".into(),
            },
            contact: ContactSettings {
                email: "hi@example.com".into(),
                phone: "+1".into(),
                location: "Lisbon".into(),
            },
            social: SocialLinks {
                instagram: "ig".into(),
                behance: "be".into(),
                dribbble: "dr".into(),
                linkedin: "li".into(),
            },
            services: vec![ServiceItem {
                title: "Identity".into(),
                description: "Logos".into(),
                image: "https://cdn/s.jpg".into(),
            }],
        };
        let flat = SettingsRecord::from_settings(Some("1".into()), &settings);
        assert_eq!(flat.about_image, "https://cdn/me.jpg");
        assert_eq!(flat.social_dribbble, "dr");

        let stored: SettingsRecord = decode(encode(&flat).unwrap()).unwrap();
        assert_eq!(SiteSettings::from(stored), settings);
    }

    #[test]
    fn empty_settings_row_yields_defaults() {
        let stored: SettingsRecord = decode(record(json!({ "id": 1, "hero_roles": null }))).unwrap();
        assert_eq!(stored.id.as_deref(), Some("1"));
        assert_eq!(SiteSettings::from(stored), SiteSettings::default());
    }

    #[test]
    fn categories_and_published_ordering() {
        let projects = vec![
            Project { category: "Web".into(), ..Default::default() },
            Project { category: "Print".into(), ..Default::default() },
            Project { category: "Web".into(), ..Default::default() },
            Project::default(),
        ];
        assert_eq!(categories(&projects), vec!["Web".to_string(), "Print".to_string()]);

        let posts = vec![
            BlogPost { id: "a".into(), published: true, created_at: Some("2024-01-01".into()), ..Default::default() },
            BlogPost { id: "b".into(), published: false, ..Default::default() },
            BlogPost { id: "c".into(), published: true, created_at: Some("2024-06-01".into()), ..Default::default() },
        ];
        let ids: Vec<&str> = published_posts(&posts).iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a"]);
    }
}
