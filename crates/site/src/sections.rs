use foundation::SectionId;

/// Home page anchors tracked by the bottom navigation, top to bottom.
pub const HOME_SECTIONS: [&str; 6] = ["home", "about", "work", "services", "blog", "contact"];

pub fn home_section_ids() -> Vec<SectionId> {
    HOME_SECTIONS.iter().map(|id| SectionId::from(*id)).collect()
}

/// Label shown in the navigation for a home section.
pub fn section_label(id: &str) -> &'static str {
    match id {
        "home" => "Home",
        "about" => "About",
        "work" => "Work",
        "services" => "Services",
        "blog" => "Journal",
        "contact" => "Contact",
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_follow_page_order() {
        let ids = home_section_ids();
        assert_eq!(ids.len(), HOME_SECTIONS.len());
        assert_eq!(ids[0].as_str(), "home");
        assert_eq!(ids[5].as_str(), "contact");
        assert!(HOME_SECTIONS.iter().all(|id| !section_label(id).is_empty()));
    }
}
