//! Scope identifiers for flag evaluation.

/// A value that identifies who flags are evaluated for.
///
/// Hosts implement this for their own types, for example a user or a team:
///
/// ```
/// use mogotes_features::FlagScope;
///
/// struct Team {
///     id: u64,
/// }
///
/// impl FlagScope for Team {
///     fn flag_scope_id(&self) -> Option<String> {
///         Some(format!("team:{}", self.id))
///     }
/// }
///
/// assert_eq!(Team { id: 7 }.flag_scope_id().as_deref(), Some("team:7"));
/// ```
pub trait FlagScope {
    /// Scope identifier, or `None` for the global scope.
    fn flag_scope_id(&self) -> Option<String>;
}

impl FlagScope for str {
    fn flag_scope_id(&self) -> Option<String> {
        Some(self.to_string())
    }
}

impl FlagScope for String {
    fn flag_scope_id(&self) -> Option<String> {
        Some(self.clone())
    }
}

impl<T: FlagScope> FlagScope for Option<T> {
    fn flag_scope_id(&self) -> Option<String> {
        self.as_ref().and_then(T::flag_scope_id)
    }
}

impl<T: FlagScope + ?Sized> FlagScope for &T {
    fn flag_scope_id(&self) -> Option<String> {
        (**self).flag_scope_id()
    }
}
