//! Page layout shared by all HTML responses

use crate::markup::Element;
use actix_web::http::StatusCode;

const STYLE: &str = "
body { font-family: sans-serif; margin: 0 auto; max-width: 48rem; padding: 1rem; }
nav a { margin-right: 1rem; }
fieldset { border: 1px solid #ddd; margin-bottom: 1rem; }
.setting { margin: 0.4rem 0; }
.label-inline { display: inline-block; min-width: 12rem; }
.actions a, .actions input { margin-right: 1rem; }
.notice { padding: 0.6rem; margin: 1rem 0; }
.notice-success { background: #e6f4ea; }
.notice-error { background: #fce8e6; }
.row { display: flex; gap: 2rem; }
table { border-collapse: collapse; }
td, th { padding: 0.2rem 0.6rem; text-align: left; }
";

const NAVIGATION: [(&str, &str); 3] = [("/", "settings"), ("/wifi", "wifi"), ("/wifi/scan", "scan")];

#[derive(Clone, Debug, PartialEq)]
pub enum Notice {
    Success(String),
    Error(String),
}

impl Notice {
    fn to_element(&self) -> Element {
        let (class, message) = match self {
            Notice::Success(message) => ("notice notice-success", message),
            Notice::Error(message) => ("notice notice-error", message),
        };
        Element::new("div")
            .attr("class", class)
            .attr("role", "status")
            .text(message.as_str())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Page {
    title: String,
    notice: Option<Notice>,
    sections: Vec<Element>,
    status: StatusCode,
}

impl Page {
    pub fn new(title: impl Into<String>) -> Self {
        Page {
            title: title.into(),
            notice: None,
            sections: Vec::new(),
            status: StatusCode::OK,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Page::new("error").with_notice(Notice::Error(message.into()))
    }

    /// Ask before a destructive action; confirming posts to `action`
    pub fn confirm(question: &str, action: &str) -> Self {
        Page::new("confirm").with_section(
            Element::new("form")
                .attr("method", "post")
                .attr("action", action)
                .child(Element::new("p").text(question))
                .child(
                    Element::new("div")
                        .attr("class", "actions")
                        .child(
                            Element::new("input")
                                .attr("type", "submit")
                                .attr("value", "confirm"),
                        )
                        .child(
                            Element::new("a")
                                .attr("class", "button button-outline")
                                .attr("href", "/")
                                .text("cancel"),
                        ),
                ),
        )
    }

    pub fn with_notice(mut self, notice: Notice) -> Self {
        self.notice = Some(notice);
        self
    }

    pub fn with_section(mut self, section: Element) -> Self {
        self.sections.push(section);
        self
    }

    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn status_code(&self) -> StatusCode {
        self.status
    }

    pub fn render(&self) -> String {
        let head = Element::new("head")
            .child(Element::new("meta").attr("charset", "utf-8"))
            .child(
                Element::new("meta")
                    .attr("name", "viewport")
                    .attr("content", "width=device-width, initial-scale=1"),
            )
            .child(Element::new("title").text(format!("esp settings - {}", self.title)))
            .child(Element::new("style").raw(STYLE));

        let nav = Element::new("nav").children(
            NAVIGATION
                .into_iter()
                .map(|(href, label)| Element::new("a").attr("href", href).text(label)),
        );

        let body = Element::new("body")
            .child(Element::new("header").child(nav))
            .children(self.notice.iter().map(Notice::to_element))
            .child(Element::new("main").children(self.sections.iter().cloned()));

        let html = Element::new("html")
            .attr("lang", "en")
            .child(head)
            .child(body);

        format!("<!DOCTYPE html>\n{html}")
    }
}
