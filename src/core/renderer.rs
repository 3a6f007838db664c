use crate::core::dom::{Document, Element, Node, LOADING_PLACEHOLDER};
use crate::domain::model::{FormField, Service};
use crate::utils::error::{Result, SiteError};
use chrono::Datelike;

pub const TAGLINE_ID: &str = "tagline";
pub const SERVICES_CONTAINER_ID: &str = "services-container";
pub const CONTACT_FORM_ID: &str = "contact-form";
pub const FORM_STATUS_ID: &str = "form-status";

/// 建立頁面外殼：標語、服務容器與聯絡表單。標語一開始帶有 loading 標記。
pub fn page_shell(company_name: &str, page_title: &str) -> Document {
    let head = Element::new("head")
        .with_child(Element::new("meta").with_attr("charset", "utf-8"))
        .with_child(
            Element::new("meta")
                .with_attr("name", "viewport")
                .with_attr("content", "width=device-width, initial-scale=1"),
        )
        .with_child(Element::new("title").with_text(page_title))
        .with_child(
            Element::new("link")
                .with_attr("rel", "stylesheet")
                .with_attr("href", "index.css"),
        );

    let header = Element::new("header")
        .with_class("hero")
        .with_child(Element::new("h1").with_text(company_name))
        .with_child(
            Element::new("p")
                .with_id(TAGLINE_ID)
                .with_class("tagline")
                .with_class(LOADING_PLACEHOLDER),
        );

    let services = Element::new("section")
        .with_id("services")
        .with_child(Element::new("h2").with_text("Our Services"))
        .with_child(
            Element::new("div")
                .with_id(SERVICES_CONTAINER_ID)
                .with_class("services-grid"),
        );

    let contact = Element::new("section")
        .with_id("contact")
        .with_child(Element::new("h2").with_text("Contact Us"))
        .with_child(contact_form())
        .with_child(
            Element::new("p")
                .with_id(FORM_STATUS_ID)
                .with_attr("role", "status")
                .with_attr("aria-live", "polite"),
        );

    let footer = Element::new("footer").with_child(Element::new("p").with_text(format!(
        "© {} {}. All rights reserved.",
        chrono::Local::now().year(),
        company_name
    )));

    let body = Element::new("body")
        .with_child(header)
        .with_child(Element::new("main").with_child(services).with_child(contact))
        .with_child(footer);

    Document::new(
        Element::new("html")
            .with_attr("lang", "en")
            .with_child(head)
            .with_child(body),
    )
}

fn contact_form() -> Element {
    let mut form = Element::new("form")
        .with_id(CONTACT_FORM_ID)
        .with_attr("novalidate", "novalidate");

    for field in FormField::ALL {
        let (label, input) = match field {
            FormField::Name => (
                "Name",
                Element::new("input")
                    .with_attr("type", "text")
                    .with_attr("value", ""),
            ),
            FormField::Email => (
                "Email",
                Element::new("input")
                    .with_attr("type", "email")
                    .with_attr("value", ""),
            ),
            FormField::Message => ("Message", Element::new("textarea").with_attr("rows", "5")),
        };

        form = form.with_child(
            Element::new("div")
                .with_class("form-group")
                .with_child(
                    Element::new("label")
                        .with_attr("for", field.element_id())
                        .with_text(label),
                )
                .with_child(
                    input
                        .with_id(field.element_id())
                        .with_attr("name", field.element_id()),
                )
                .with_child(
                    Element::new("span")
                        .with_id(field.error_element_id())
                        .with_class("error-message"),
                ),
        );
    }

    form.with_child(
        Element::new("button")
            .with_attr("type", "submit")
            .with_text("Send Message"),
    )
}

/// 以目錄內容取代服務容器，每項服務一張卡片，描述欄位先放 loading 標記。
pub fn render_services(document: &mut Document, services: &[Service]) -> Result<()> {
    for id in [TAGLINE_ID, SERVICES_CONTAINER_ID] {
        if document.get_element_by_id(id).is_none() {
            tracing::error!("Required elements not found: #{}", id);
            return Err(SiteError::MissingElementError { id: id.to_string() });
        }
    }
    let container = document.require_mut(SERVICES_CONTAINER_ID)?;

    let cards = services
        .iter()
        .map(|service| Node::Element(service_card(service)))
        .collect();
    container.replace_children(cards);

    tracing::debug!("Rendered {} service cards", services.len());
    Ok(())
}

fn service_card(service: &Service) -> Element {
    Element::new("div")
        .with_class("service-card")
        .with_attr("data-title", service.title)
        .with_child(
            Element::new("div")
                .with_class("icon")
                .with_attr("aria-hidden", "true")
                .with_raw(service.icon),
        )
        .with_child(Element::new("h3").with_text(service.title))
        .with_child(
            Element::new("p")
                .with_class("description")
                .with_class(LOADING_PLACEHOLDER),
        )
}
