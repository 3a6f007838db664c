use crate::domain::model::Service;

const SERVICES: [Service; 4] = [
    Service {
        title: "Real Estate Development",
        prompt: "Engage in real estate business, including purchase, lease, development, and construction of all types of properties.",
        icon: r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" fill="currentColor"><path d="M10 20v-6h4v6h5v-8h3L12 3 2 12h3v8h5z"/></svg>"#,
    },
    Service {
        title: "Sustainable Infrastructure",
        prompt: "Act as town planners and infrastructure developers with a focus on sustainability.",
        icon: r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" fill="currentColor"><path d="M12 2c-5.3 0-9.8 3.9-10.8 9h2.1c.9-4.2 4.5-7.5 8.7-7.5s7.8 3.3 8.7 7.5h2.1c-1-5.1-5.5-9-10.8-9zM12 22c5.3 0 9.8-3.9 10.8-9h-2.1c-.9 4.2-4.5 7.5-8.7 7.5s-7.8-3.3-8.7-7.5H1.2C2.2 18.1 6.7 22 12 22zm-4-9c0-2.2 1.8-4 4-4s4 1.8 4 4-1.8 4-4 4-4-1.8-4-4z"/></svg>"#,
    },
    Service {
        title: "Renovation & Redevelopment",
        prompt: "Undertake renovation and redevelopment of existing structures.",
        icon: r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" fill="currentColor"><path d="M22.7 19l-9.1-9.1c.9-2.3.4-5-1.5-6.9-2-2-5-2.4-7.4-1.3L9 6 6 9 1.6 4.7C.4 7.1.9 10.1 2.9 12.1c1.9 1.9 4.6 2.4 6.9 1.5l9.1 9.1c.4.4 1 .4 1.4 0l2.3-2.3c.5-.4.5-1.1.1-1.4z"/></svg>"#,
    },
    Service {
        title: "AI-Driven Solutions",
        prompt: "Provide AI-driven construction, design, and professional services.",
        icon: r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" fill="currentColor"><path d="M19 2H5c-1.1 0-2 .9-2 2v14c0 1.1.9 2 2 2h14c1.1 0 2-.9 2-2V4c0-1.1-.9-2-2-2zM9 18H7v-2h2v2zm4 0h-2v-2h2v2zm4 0h-2v-2h2v2zm-8-4H7v-2h2v2zm4 0h-2v-2h2v2zm4 0h-2v-2h2v2zm-8-4H7V8h2v2zm4 0h-2V8h2v2zm4 0h-2V8h2v2zm-8-4H7V4h2v2zm4 0h-2V4h2v2zm4 0h-2V4h2v2z"/></svg>"#,
    },
];

/// 頁面上依序列出的服務
pub fn services() -> &'static [Service] {
    &SERVICES
}

pub fn find(title: &str) -> Option<&'static Service> {
    SERVICES.iter().find(|service| service.title == title)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_order_is_stable() {
        let titles: Vec<&str> = services().iter().map(|s| s.title).collect();
        assert_eq!(
            titles,
            vec![
                "Real Estate Development",
                "Sustainable Infrastructure",
                "Renovation & Redevelopment",
                "AI-Driven Solutions",
            ]
        );
    }

    #[test]
    fn test_titles_are_unique_lookup_keys() {
        let unique: HashSet<&str> = services().iter().map(|s| s.title).collect();
        assert_eq!(unique.len(), services().len());

        assert!(find("AI-Driven Solutions").is_some());
        assert!(find("ai-driven solutions").is_none());
    }

    #[test]
    fn test_icons_are_inline_svg() {
        for service in services() {
            assert!(service.icon.starts_with("<svg"), "{} icon", service.title);
            assert!(!service.prompt.is_empty());
        }
    }
}
