/// Translates user-facing strings.
pub trait Translate: Send + Sync {
    fn translate(&self, source: &str) -> String;
}

/// Returns every string unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityTranslator;

impl Translate for IdentityTranslator {
    fn translate(&self, source: &str) -> String {
        source.to_owned()
    }
}
