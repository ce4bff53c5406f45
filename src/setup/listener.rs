//! The listener declaration the fixture toolkit depends on.

use quick_xml::escape::escape;

use crate::infra::Element;

pub const LISTENERS_SECTION: &str = "listeners";
pub const LISTENER_ELEMENT: &str = "listener";
pub const ARGUMENTS_ELEMENT: &str = "arguments";
pub const OBJECT_ELEMENT: &str = "object";
pub const CLASS_ATTRIBUTE: &str = "class";

/// A `<listener>` entry with a single object argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerDeclaration {
    listener_class: &'static str,
    argument_class: &'static str,
}

/// The listener that resets fixtures between tests.
pub const FIXTURE_INJECTOR: ListenerDeclaration = ListenerDeclaration {
    listener_class: r"CakephpTestSuiteLight\FixtureInjector",
    argument_class: r"CakephpTestSuiteLight\FixtureManager",
};

impl ListenerDeclaration {
    /// True when `element` declares exactly this listener and argument.
    pub fn matches(&self, element: &Element) -> bool {
        if element.name() != LISTENER_ELEMENT
            || element.attribute(CLASS_ATTRIBUTE) != Some(self.listener_class)
        {
            return false;
        }

        let [arguments] = element.children() else {
            return false;
        };
        if arguments.name() != ARGUMENTS_ELEMENT {
            return false;
        }

        let [object] = arguments.children() else {
            return false;
        };
        object.name() == OBJECT_ELEMENT
            && object.attribute(CLASS_ATTRIBUTE) == Some(self.argument_class)
            && object.children().is_empty()
    }

    /// The entry as lines of markup, nested with `unit`.
    pub fn lines(&self, unit: &str) -> Vec<String> {
        vec![
            format!(
                r#"<{LISTENER_ELEMENT} {CLASS_ATTRIBUTE}="{}">"#,
                escape(self.listener_class)
            ),
            format!("{unit}<{ARGUMENTS_ELEMENT}>"),
            format!(
                r#"{unit}{unit}<{OBJECT_ELEMENT} {CLASS_ATTRIBUTE}="{}"/>"#,
                escape(self.argument_class)
            ),
            format!("{unit}</{ARGUMENTS_ELEMENT}>"),
            format!("</{LISTENER_ELEMENT}>"),
        ]
    }
}
