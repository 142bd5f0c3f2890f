// File: ctxhelp-core/src/render.rs
//
// HTML fragments for a help label / icon / popover, in the markup the
// Bootstrap tooltip & popover scripts expect.

use handlebars::Handlebars;
use serde::Serialize;
use ctxhelp_common::error::Error;
use ctxhelp_common::models::{ContextHelp, HelpQuery};

const HELP_TEMPLATE_NAME: &str = "context_help";

// `{{x}}` is HTML-escaped by handlebars, which is what every attribute needs.
const HELP_TEMPLATE: &str = concat!(
    r#"<span style="white-space: nowrap;">"#,
    r#"{{#if name}}{{#if tooltip}}"#,
    r#"<span data-toggle="tooltip" data-placement="bottom" data-container="body" "#,
    r#"data-trigger="hover" title="{{tooltip}}">{{name}} </span>"#,
    r#"{{else}}{{name}} {{/if}}{{/if}}"#,
    r#"{{#if active}}"#,
    r#"<span class="glyphicon glyphicon-question-sign" tabindex="0" role="button" "#,
    r#"style="color: dodgerblue; font-size:14px" "#,
    r#"data-toggle="popover" data-html="true" "#,
    r#"data-title="{{data_title}}" data-content="{{content}}" "#,
    r#"data-trigger="focus" data-placement="right" data-container="body"></span>"#,
    r#"{{else}}"#,
    r#"<span class="glyphicon glyphicon-question-sign" style="{{icon_style}}"></span>"#,
    r#"{{/if}}"#,
    r#"{{#if editor_link}} <a class="glyphicon glyphicon-edit" href="{{editor_link}}" "#,
    r#"style="color: gray; font-size:14px; text-decoration: none" tabindex="0"></a>{{/if}}"#,
    r#"</span>"#,
);

/// Whether the caption is shown next to the icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelpStyle {
    /// Icon (and edit link) only.
    IconOnly,
    /// Caption, optionally with a tooltip, followed by the icon.
    NameWithHelp,
}

/// Everything that ends up in one rendered fragment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HelpDisplay {
    pub name: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub tooltip: Option<String>,
    pub editor_link: Option<String>,
}

impl HelpDisplay {
    /// Popover with fixed content and no caption.
    pub fn plain(title: &str, content: &str) -> Self {
        Self {
            title: Some(title.to_string()),
            content: Some(content.to_string()),
            ..Default::default()
        }
    }

    /// Caption that doubles as the popover title.
    pub fn named(name: &str, content: Option<&str>, tooltip: Option<&str>) -> Self {
        Self {
            name: Some(name.to_string()),
            title: Some(name.to_string()),
            content: content.map(str::to_string),
            tooltip: tooltip.map(str::to_string),
            editor_link: None,
        }
    }

    /// Display for a page or field after resolution.
    ///
    /// The title is the field's label (or property name) for field lookups and
    /// the controller name for page lookups.
    pub fn for_query(
        query: &HelpQuery,
        label: Option<&str>,
        resolved: Option<&ContextHelp>,
        may_edit: bool,
        style: HelpStyle,
    ) -> Self {
        let title = match query.property() {
            Some(property) => label.filter(|l| !l.trim().is_empty()).unwrap_or(property),
            None => query.controller(),
        };

        Self {
            name: match style {
                HelpStyle::IconOnly => None,
                HelpStyle::NameWithHelp => Some(title.to_string()),
            },
            title: Some(title.to_string()),
            content: resolved.and_then(|ch| ch.help_text.clone()),
            tooltip: resolved.and_then(|ch| ch.tooltip.clone()),
            editor_link: may_edit.then(|| editor_link(query, resolved)),
        }
    }

    pub fn has_editor(&self) -> bool {
        not_blank(self.editor_link.as_deref()).is_some()
    }

    /// Active icon: there is something to show in the popover.
    pub fn is_active(&self) -> bool {
        not_blank(self.title.as_deref()).is_some() && not_blank(self.content.as_deref()).is_some()
    }
}

/// Edit link for the resolved entry, or a pre-filled create link when there is none.
pub fn editor_link(query: &HelpQuery, resolved: Option<&ContextHelp>) -> String {
    if let Some(ch) = resolved {
        return format!("/ContextHelp/Edit/{}", ch.context_help_id);
    }

    let mut link = format!("/ContextHelp/Create?cont={}", urlencoding::encode(query.controller()));
    if let Some(action) = query.action() {
        link.push_str("&act=");
        link.push_str(&urlencoding::encode(action));
    }
    if let Some(property) = query.property() {
        link.push_str("&prop=");
        link.push_str(&urlencoding::encode(property));
    }
    link
}

fn not_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

#[derive(Serialize)]
struct TemplateData<'a> {
    name: Option<&'a str>,
    tooltip: Option<&'a str>,
    active: bool,
    icon_style: &'static str,
    data_title: Option<String>,
    content: Option<&'a str>,
    editor_link: Option<&'a str>,
}

/// Renders [`HelpDisplay`] values. Cheap to share behind an `Arc`.
pub struct HelpRenderer {
    registry: Handlebars<'static>,
}

impl HelpRenderer {
    pub fn new() -> Result<Self, Error> {
        let mut registry = Handlebars::new();
        registry
            .register_template_string(HELP_TEMPLATE_NAME, HELP_TEMPLATE)
            .map_err(|e| Error::Template(e.to_string()))?;
        Ok(Self { registry })
    }

    pub fn render(&self, display: &HelpDisplay) -> Result<String, Error> {
        let active = display.is_active();
        let icon_style = match (active, display.has_editor()) {
            (true, _) => "color: dodgerblue; font-size:14px",
            (false, true) => "color: lightgray; font-size:14px",
            (false, false) => "color: transparent; font-size:14px",
        };

        let data = TemplateData {
            name: not_blank(display.name.as_deref()),
            tooltip: not_blank(display.tooltip.as_deref()),
            active,
            icon_style,
            data_title: not_blank(display.title.as_deref())
                .map(|t| format!("<strong>{t}</strong>")),
            content: not_blank(display.content.as_deref()),
            editor_link: not_blank(display.editor_link.as_deref()),
        };

        self.registry
            .render(HELP_TEMPLATE_NAME, &data)
            .map_err(|e| Error::Template(e.to_string()))
    }
}
