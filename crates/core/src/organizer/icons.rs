/// Default icon for a symbol tag.
///
/// Tags follow the LSP symbol kinds; kinds without a sensible icon, and tags
/// outside that list, get none.
pub fn icon_for_tag(tag: &str) -> Option<&'static str> {
    let icon = match tag {
        "file" => "icon-file",
        "module" => "icon-database",
        "namespace" => "icon-tag",
        "package" => "icon-package",
        "class" => "icon-puzzle",
        "method" | "function" => "icon-gear",
        "property" | "field" | "enum-member" => "icon-primitive-dot",
        "constructor" => "icon-tools",
        "enum" => "icon-list-unordered",
        "interface" | "key" => "icon-key",
        "variable" => "icon-code",
        "constant" => "icon-primitive-square",
        "string" => "icon-quote",
        "number" | "operator" => "icon-plus",
        "boolean" => "icon-question",
        "array" => "icon-list-ordered",
        "object" => "icon-file-code",
        "struct" => "icon-book",
        "event" => "icon-calendar",
        _ => return None,
    };
    Some(icon)
}
