//! Built-in tag grammars.
//!
//! The HTML entries are the handful of tags the linter has always checked;
//! the rest describe the ISML tag set. Everything is built once on first
//! access.

use std::sync::LazyLock;

use rustc_hash::FxHashMap;

use super::AttributeRequirement;
use super::ClosingPolicy;
use super::TagSpec;
use super::TagSpecs;

/// Builder for creating tag grammars with a fluent API
struct TagBuilder {
    name: &'static str,
    closing_policy: ClosingPolicy,
    required: Vec<AttributeRequirement>,
    optional: Vec<AttributeRequirement>,
    redundant: Vec<&'static str>,
}

impl TagBuilder {
    fn new(name: &'static str) -> Self {
        TagBuilder {
            name,
            closing_policy: ClosingPolicy::Unconstrained,
            required: Vec::new(),
            optional: Vec::new(),
            redundant: Vec::new(),
        }
    }

    fn self_closing(mut self) -> Self {
        self.closing_policy = ClosingPolicy::MustSelfClose;
        self
    }

    fn paired(mut self) -> Self {
        self.closing_policy = ClosingPolicy::MustNotSelfClose;
        self
    }

    fn required(mut self, requirements: Vec<AttributeRequirement>) -> Self {
        self.required = requirements;
        self
    }

    fn optional(mut self, requirements: Vec<AttributeRequirement>) -> Self {
        self.optional = requirements;
        self
    }

    fn redundant(mut self, names: Vec<&'static str>) -> Self {
        self.redundant = names;
        self
    }

    fn build(self) -> TagSpec {
        TagSpec {
            name: self.name.to_string(),
            closing_policy: self.closing_policy,
            required_attributes: self.required,
            optional_attributes: self.optional,
            redundant_attributes: self.redundant.into_iter().map(str::to_string).collect(),
        }
    }
}

fn attr(names: &str) -> AttributeRequirement {
    AttributeRequirement::alternatives(names)
}

fn one_of(name: &str, values: &[&str]) -> AttributeRequirement {
    AttributeRequirement::with_values(name, values)
}

const ENCODINGS: &[&str] = &[
    "on",
    "off",
    "htmlcontent",
    "htmlsinglequote",
    "htmldoublequote",
    "htmlunquote",
    "jshtml",
    "jsattribute",
    "jsblock",
    "jssource",
    "jsonvalue",
    "uricomponent",
    "uristrict",
    "xmlcontent",
    "xmlsinglequote",
    "xmldoublequote",
    "xmlcomment",
];

const SCOPES: &[&str] = &["session", "request", "page", "pdict"];

const OBJECT_VIEWS: &[&str] = &[
    "none",
    "searchhit",
    "recommendation",
    "setproduct",
    "detail",
];

static BUILTIN_SPECS: LazyLock<TagSpecs> = LazyLock::new(|| {
    let tags = vec![
        // HTML
        TagBuilder::new("a")
            .paired()
            .required(vec![attr("href")])
            .redundant(vec!["alt"])
            .build(),
        TagBuilder::new("div").paired().build(),
        TagBuilder::new("main")
            .paired()
            .redundant(vec!["role"])
            .build(),
        TagBuilder::new("nav")
            .paired()
            .redundant(vec!["role"])
            .build(),
        TagBuilder::new("script")
            .optional(vec![one_of("async", &["async"]), one_of("defer", &["defer"])])
            .build(),
        TagBuilder::new("img")
            .required(vec![attr("src"), attr("alt")])
            .build(),
        // Conditionals and loops
        TagBuilder::new("isif")
            .paired()
            .required(vec![attr("condition")])
            .build(),
        TagBuilder::new("iselseif")
            .required(vec![attr("condition")])
            .build(),
        TagBuilder::new("iselse")
            .redundant(vec!["condition"])
            .build(),
        TagBuilder::new("isloop")
            .paired()
            .required(vec![attr("items|iterator")])
            .build(),
        TagBuilder::new("isbreak").self_closing().build(),
        TagBuilder::new("iscontinue").self_closing().build(),
        TagBuilder::new("isnext").self_closing().build(),
        // Variables and output
        TagBuilder::new("isset")
            .self_closing()
            .required(vec![attr("name"), attr("value")])
            .optional(vec![one_of("scope", SCOPES)])
            .build(),
        TagBuilder::new("isremove")
            .self_closing()
            .required(vec![attr("name")])
            .optional(vec![one_of("scope", SCOPES)])
            .redundant(vec!["value"])
            .build(),
        TagBuilder::new("isprint")
            .self_closing()
            .required(vec![attr("value")])
            .optional(vec![
                one_of("encoding", ENCODINGS),
                one_of("timezone", &["SITE", "INSTANCE", "utc"]),
            ])
            .build(),
        // Composition
        TagBuilder::new("isinclude")
            .self_closing()
            .required(vec![attr("template|url")])
            .optional(vec![one_of("sf-toolkit", &["on", "off"])])
            .build(),
        TagBuilder::new("isdecorate")
            .paired()
            .required(vec![attr("template")])
            .build(),
        TagBuilder::new("isreplace").self_closing().build(),
        TagBuilder::new("ismodule")
            .self_closing()
            .required(vec![attr("template"), attr("name")])
            .build(),
        TagBuilder::new("iscomponent")
            .self_closing()
            .required(vec![attr("pipeline")])
            .build(),
        TagBuilder::new("isslot")
            .self_closing()
            .required(vec![
                attr("id"),
                one_of("context", &["global", "category", "folder"]),
                attr("description"),
            ])
            .build(),
        TagBuilder::new("isobject")
            .paired()
            .required(vec![
                attr("object"),
                one_of("view", OBJECT_VIEWS),
            ])
            .build(),
        // Response control
        TagBuilder::new("iscontent")
            .self_closing()
            .optional(vec![
                one_of("encoding", &["on", "off", "html", "xml", "wml"]),
                one_of("compact", &["true", "false"]),
            ])
            .build(),
        TagBuilder::new("iscache")
            .self_closing()
            .required(vec![one_of("type", &["relative", "daily"]), attr("hour|minute")])
            .optional(vec![one_of("varyby", &["price_promotion"])])
            .build(),
        TagBuilder::new("isredirect")
            .self_closing()
            .required(vec![attr("location")])
            .optional(vec![one_of("permanent", &["true", "false"])])
            .build(),
        TagBuilder::new("isstatus")
            .self_closing()
            .required(vec![attr("value")])
            .build(),
        TagBuilder::new("isselect")
            .self_closing()
            .required(vec![
                attr("iterator"),
                attr("description"),
                attr("value"),
                attr("condition"),
            ])
            .optional(vec![one_of("encoding", &["on", "off"])])
            .build(),
        // Analytics
        TagBuilder::new("isactivedatahead").self_closing().build(),
        TagBuilder::new("isactivedatacontext")
            .self_closing()
            .required(vec![attr("category")])
            .build(),
        TagBuilder::new("isanalyticsoff").self_closing().build(),
        // Raw blocks
        TagBuilder::new("iscomment").paired().build(),
        TagBuilder::new("isscript").paired().build(),
    ];

    let specs: FxHashMap<String, TagSpec> = tags
        .into_iter()
        .map(|spec| (spec.name.clone(), spec))
        .collect();

    TagSpecs::new(specs)
});

pub(super) fn isml_builtin_specs() -> &'static TagSpecs {
    &BUILTIN_SPECS
}
