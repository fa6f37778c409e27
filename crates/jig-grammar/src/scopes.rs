//! Scope names shared by every generated grammar.

use jig_registry::LanguageDescriptor;

/// Root scope of the shared embed grammar used for plain `.jig` files.
pub const BASE_SCOPE: &str = "text.jig";

/// Root scope of the fenced-block injection grammar.
pub const FENCED_SCOPE: &str = "markdown.jig.codeblock";

/// Scope added to the content of every greedy embed.
pub const GREEDY_CONTENT_SCOPE: &str = "meta.embedded.block.greedy.jig";

/// Host scope of the documentation markup that fenced blocks live in.
pub const MARKDOWN_SCOPE: &str = "text.html.markdown";

/// Scope of a fenced code block in the markdown grammar.
pub const FENCED_BLOCK_SCOPE: &str = "markup.fenced_code.block.markdown";

/// Comment regions.
pub const COMMENT: &str = "comment.block.jig";
/// `{{ }}` and `{{{ }}}` regions.
pub const EXPRESSION: &str = "meta.embedded.expression.jig";
/// `@{{ }}` regions.
pub const ESCAPED_INTERPOLATION: &str = "meta.interpolation.escaped.jig";
/// Literal content of `@{{ }}`.
pub const ESCAPED_CONTENT: &str = "string.unquoted.escaped.jig";
/// Tag regions.
pub const TAG: &str = "meta.tag.jig";
/// The closing `@end` tag.
pub const TAG_END: &str = "meta.tag.end.jig";
/// Alternate-branch tags.
pub const TAG_ELSE: &str = "meta.tag.else.jig";
/// The tag name token, `@` included.
pub const TAG_NAME: &str = "support.function.tag.jig";
/// Tag argument lists.
pub const ARGUMENTS: &str = "meta.arguments.jig";
/// Nested blocks inside an embed.
pub const BLOCK: &str = "meta.block.jig";
/// The `::` separator of an embed-open marker.
pub const LANGUAGE_SEPARATOR: &str = "punctuation.separator.language.jig";
/// The language name of an embed-open marker.
pub const LANGUAGE_NAME: &str = "entity.name.type.language.jig";
/// Grammar that tag arguments and expressions are delegated to.
pub const EXPRESSION_GRAMMAR: &str = "source.js";

/// Regions Jig creates itself. Injections never re-enter them.
pub const SELF_REGIONS: [&str; 4] = [COMMENT, EXPRESSION, ESCAPED_INTERPOLATION, TAG];

/// Root scope of the generated grammar for `language`.
///
/// # Examples
///
/// ```
/// use jig_grammar::scopes::grammar_scope;
/// use jig_registry::LanguageDescriptor;
///
/// let yaml = LanguageDescriptor::new("yaml", "YAML", "source.yaml");
/// assert_eq!(grammar_scope(&yaml), "source.jig.yaml");
/// ```
#[must_use]
pub fn grammar_scope(language: &LanguageDescriptor) -> String {
    format!("{}.jig.{}", language.scope_category(), language.id())
}

/// Content scope of an embed whose target is `language`.
#[must_use]
pub fn content_scope(language: &LanguageDescriptor) -> String {
    format!("meta.embedded.block.jig.{}", language.id())
}

/// Full `contentName` of an embed targeting `language`, including the
/// greedy marker when the target has greedy contexts.
#[must_use]
pub fn content_name(language: &LanguageDescriptor) -> String {
    if language.has_greedy_contexts() {
        format!("{} {GREEDY_CONTENT_SCOPE}", content_scope(language))
    } else {
        content_scope(language)
    }
}

/// Editor language id of the generated language for `language`.
#[must_use]
pub fn editor_language(language: &LanguageDescriptor) -> String {
    format!("jig-{}", language.id())
}

/// Repository name of the nested-block consumer for `language`.
#[must_use]
pub fn block_rule_name(language: &LanguageDescriptor) -> String {
    format!("block-{}", language.id())
}

/// Whether `language` is hosted on the documentation markup grammar.
#[must_use]
pub fn is_markdown_hosted(language: &LanguageDescriptor) -> bool {
    language.host_grammar_scope() == MARKDOWN_SCOPE
}
