pub const JAVA_TAGS_SCM: &str = include_str!("java_tags.scm");
