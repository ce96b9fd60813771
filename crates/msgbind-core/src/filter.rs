//! Argument filters applied before formatting

use crate::interface::{AnnotationKind, MessageInterfaceId, MethodDecl};
use crate::value::Value;
use msgbind_common::{BoxError, MsgBindError, Result};
use once_cell::sync::OnceCell;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Transforms one call argument
pub trait ArgFilter: Send + Sync {
    /// Produce the value passed on to the formatter
    fn apply(&self, value: Value) -> std::result::Result<Value, BoxError>;
}

impl<F> ArgFilter for F
where
    F: Fn(Value) -> std::result::Result<Value, BoxError> + Send + Sync,
{
    fn apply(&self, value: Value) -> std::result::Result<Value, BoxError> {
        self(value)
    }
}

type FilterFactory = Arc<dyn Fn() -> Arc<dyn ArgFilter> + Send + Sync>;

/// Hands out filter instances for a binding
pub enum FilterProvider {
    /// Built on first lookup and reused afterwards
    Cached {
        /// Builds the filter
        factory: FilterFactory,
        /// The filter, once built
        instance: OnceCell<Arc<dyn ArgFilter>>,
    },
    /// Built anew on every lookup
    Fresh {
        /// Builds a filter per lookup
        factory: FilterFactory,
    },
}

impl FilterProvider {
    /// A provider that materialises its filter once
    pub fn cached<F>(factory: F) -> Self
    where
        F: Fn() -> Arc<dyn ArgFilter> + Send + Sync + 'static,
    {
        Self::Cached {
            factory: Arc::new(factory),
            instance: OnceCell::new(),
        }
    }

    /// A provider that creates a new filter per lookup
    pub fn fresh<F>(factory: F) -> Self
    where
        F: Fn() -> Arc<dyn ArgFilter> + Send + Sync + 'static,
    {
        Self::Fresh {
            factory: Arc::new(factory),
        }
    }

    /// A cached provider around an existing filter
    pub fn instance(filter: impl ArgFilter + 'static) -> Self {
        let filter: Arc<dyn ArgFilter> = Arc::new(filter);
        Self::Cached {
            factory: Arc::new(move || Arc::clone(&filter)),
            instance: OnceCell::new(),
        }
    }

    /// Get the filter to apply
    pub fn get(&self) -> Arc<dyn ArgFilter> {
        match self {
            Self::Cached { factory, instance } => Arc::clone(instance.get_or_init(|| factory())),
            Self::Fresh { factory } => factory(),
        }
    }
}

impl fmt::Debug for FilterProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cached { instance, .. } => f
                .debug_struct("Cached")
                .field("materialised", &instance.get().is_some())
                .finish(),
            Self::Fresh { .. } => f.write_str("Fresh"),
        }
    }
}

/// Lookup key of a filter binding: a type name and an optional marker
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FilterKey {
    /// Declared or runtime type name
    pub type_name: String,
    /// Parameter marker, `None` for type-only bindings
    pub annotation: Option<AnnotationKind>,
}

impl FilterKey {
    /// Key for filters selected by type alone
    pub fn unannotated(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            annotation: None,
        }
    }

    /// Key for filters selected by type and parameter marker
    pub fn annotated(type_name: impl Into<String>, annotation: AnnotationKind) -> Self {
        Self {
            type_name: type_name.into(),
            annotation: Some(annotation),
        }
    }
}

/// Run every argument through its filter
///
/// Lookup per argument: the parameter's markers in declaration order, then
/// the declared type without a marker, then the runtime value type, and
/// finally pass-through.
pub fn apply_filters(
    filters: &HashMap<FilterKey, Arc<FilterProvider>>,
    interface: &MessageInterfaceId,
    method: &MethodDecl,
    args: &[Value],
) -> Result<Vec<Value>> {
    if filters.is_empty() {
        return Ok(args.to_vec());
    }

    args.iter()
        .enumerate()
        .map(|(index, arg)| {
            let declared = method.id.params().get(index).map(String::as_str);
            let annotations = method
                .param_annotations
                .get(index)
                .map_or(&[][..], Vec::as_slice);

            match find_filter(filters, declared, annotations, arg) {
                Some((type_name, provider)) => {
                    debug!(%interface, method = %method.id, index, type_name, "Applying argument filter");
                    provider
                        .get()
                        .apply(arg.clone())
                        .map_err(|source| MsgBindError::FilterDispatch {
                            type_name: type_name.to_string(),
                            interface: interface.to_string(),
                            method: method.id.to_string(),
                            source,
                        })
                }
                None => Ok(arg.clone()),
            }
        })
        .collect()
}

fn find_filter<'a>(
    filters: &'a HashMap<FilterKey, Arc<FilterProvider>>,
    declared: Option<&'a str>,
    annotations: &[AnnotationKind],
    arg: &'a Value,
) -> Option<(&'a str, &'a FilterProvider)> {
    if let Some(declared) = declared {
        for annotation in annotations {
            let key = FilterKey::annotated(declared, annotation.clone());
            if let Some(provider) = filters.get(&key) {
                return Some((declared, provider));
            }
        }
        if let Some(provider) = filters.get(&FilterKey::unannotated(declared)) {
            return Some((declared, provider));
        }
    }

    let runtime = arg.type_name();
    filters
        .get(&FilterKey::unannotated(runtime))
        .map(|provider| (runtime, provider.as_ref()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn upper() -> impl ArgFilter {
        |value: Value| -> std::result::Result<Value, BoxError> {
            Ok(value.as_str().map_or(value.clone(), |s| Value::from(s.to_uppercase())))
        }
    }

    fn suffix(tag: &'static str) -> impl ArgFilter {
        move |value: Value| -> std::result::Result<Value, BoxError> {
            Ok(Value::from(format!("{value}{tag}")))
        }
    }

    fn filters(entries: Vec<(FilterKey, FilterProvider)>) -> HashMap<FilterKey, Arc<FilterProvider>> {
        entries
            .into_iter()
            .map(|(key, provider)| (key, Arc::new(provider)))
            .collect()
    }

    #[test]
    fn test_annotation_lookup_wins_over_type() {
        let map = filters(vec![
            (FilterKey::unannotated("String"), FilterProvider::instance(suffix("-type"))),
            (
                FilterKey::annotated("String", AnnotationKind::new("Upper")),
                FilterProvider::instance(upper()),
            ),
        ]);
        let method = MethodDecl::new("greet")
            .param_annotated("String", ["Upper"])
            .param("String");
        let id = MessageInterfaceId::new("com.app.Greeter");

        let out = apply_filters(&map, &id, &method, &["a".into(), "b".into()]).unwrap();
        assert_eq!(out, vec![Value::from("A"), Value::from("b-type")]);
    }

    #[test]
    fn test_runtime_type_fallback_and_passthrough() {
        let map = filters(vec![(
            FilterKey::unannotated("i64"),
            FilterProvider::instance(suffix("!")),
        )]);
        let method = MethodDecl::new("count").param("Number").param("Number");
        let id = MessageInterfaceId::new("com.app.Counter");

        let out = apply_filters(&map, &id, &method, &[Value::from(3), Value::from(true)]).unwrap();
        assert_eq!(out, vec![Value::from("3!"), Value::from(true)]);
    }

    #[test]
    fn test_filter_failure_is_dispatch_error() {
        let failing = |_: Value| -> std::result::Result<Value, BoxError> { Err("boom".into()) };
        let map = filters(vec![(FilterKey::unannotated("String"), FilterProvider::instance(failing))]);
        let method = MethodDecl::new("greet").param("String");
        let id = MessageInterfaceId::new("com.app.Greeter");

        let error = apply_filters(&map, &id, &method, &["x".into()]).unwrap_err();
        match error {
            MsgBindError::FilterDispatch { type_name, interface, .. } => {
                assert_eq!(type_name, "String");
                assert_eq!(interface, "com.app.Greeter");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_cached_and_fresh_providers() {
        let cached_count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&cached_count);
        let cached = FilterProvider::cached(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Arc::new(upper()) as Arc<dyn ArgFilter>
        });
        cached.get();
        cached.get();
        assert_eq!(cached_count.load(Ordering::SeqCst), 1);

        let fresh_count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&fresh_count);
        let fresh = FilterProvider::fresh(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Arc::new(upper()) as Arc<dyn ArgFilter>
        });
        fresh.get();
        fresh.get();
        assert_eq!(fresh_count.load(Ordering::SeqCst), 2);
    }
}
