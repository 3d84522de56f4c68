//! Carrying a logger across call boundaries.
//!
//! Two carriers are offered:
//! - [`Context`], an immutable, explicitly passed value map keyed by type
//! - a tokio task-local, set with [`scope`] and read with [`current`]

use std::any::{Any, TypeId};
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use crate::logger::Logger;

struct Node {
    key: TypeId,
    value: Arc<dyn Any + Send + Sync>,
    parent: Option<Arc<Node>>,
}

/// An immutable chain of typed values.
///
/// Deriving a context with [`Context::with_value`] never changes the parent;
/// lookups walk from the newest value to the oldest, so a later value
/// shadows an earlier one stored under the same key.
#[derive(Clone, Default)]
pub struct Context {
    head: Option<Arc<Node>>,
}

impl Context {
    /// The empty context.
    pub fn background() -> Self {
        Self::default()
    }

    /// A child context that also carries `value` under the key type `K`.
    pub fn with_value<K: 'static, V: Any + Send + Sync>(&self, value: V) -> Context {
        Context {
            head: Some(Arc::new(Node {
                key: TypeId::of::<K>(),
                value: Arc::new(value),
                parent: self.head.clone(),
            })),
        }
    }

    /// The newest value stored under `K`, if it has type `V`.
    pub fn value<K: 'static, V: Any + Send + Sync>(&self) -> Option<&V> {
        let key = TypeId::of::<K>();
        let mut node = self.head.as_deref();
        while let Some(n) = node {
            if n.key == key {
                return n.value.downcast_ref::<V>();
            }
            node = n.parent.as_deref();
        }
        None
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut depth = 0;
        let mut node = self.head.as_deref();
        while let Some(n) = node {
            depth += 1;
            node = n.parent.as_deref();
        }
        f.debug_struct("Context").field("values", &depth).finish()
    }
}

/// Key for the logger slot. Private, so nothing outside this module can
/// overwrite or read it except through the functions below.
struct LoggerKey;

/// A child of `ctx` carrying `logger`.
pub fn attach_to_context(ctx: &Context, logger: Logger) -> Context {
    ctx.with_value::<LoggerKey, Logger>(logger)
}

/// The logger attached to `ctx`, if any.
pub fn from_context(ctx: &Context) -> Option<Logger> {
    ctx.value::<LoggerKey, Logger>().cloned()
}

tokio::task_local! {
    static CURRENT: Logger;
}

/// Run `fut` with `logger` as the task's current logger.
pub async fn scope<F: Future>(logger: Logger, fut: F) -> F::Output {
    CURRENT.scope(logger, fut).await
}

/// The logger set by an enclosing [`scope`] in this task.
pub fn current() -> Option<Logger> {
    CURRENT.try_with(Logger::clone).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Options;

    struct RequestId;

    fn file_logger(dir: &tempfile::TempDir, name: &str) -> Logger {
        let opts = Options {
            name: name.to_string(),
            output_paths: vec![dir.path().join("ctx.log").to_string_lossy().into_owned()],
            ..Options::default()
        };
        Logger::new(&opts)
    }

    #[test]
    fn test_values_are_typed_and_shadowed() {
        let root = Context::background();
        let a = root.with_value::<RequestId, String>("r-1".to_string());
        let b = a.with_value::<RequestId, String>("r-2".to_string());

        assert_eq!(root.value::<RequestId, String>(), None);
        assert_eq!(a.value::<RequestId, String>().map(String::as_str), Some("r-1"));
        assert_eq!(b.value::<RequestId, String>().map(String::as_str), Some("r-2"));
        assert_eq!(b.value::<RequestId, u64>(), None);
    }

    #[test]
    fn test_logger_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let logger = file_logger(&dir, "ctx");

        let ctx = Context::background().with_value::<RequestId, u64>(7);
        assert!(from_context(&ctx).is_none());

        let ctx = logger.with_context(&ctx);
        let found = from_context(&ctx).unwrap();
        assert_eq!(found.name(), "ctx");
        assert_eq!(ctx.value::<RequestId, u64>(), Some(&7));
    }

    #[tokio::test]
    async fn test_task_scope() {
        let dir = tempfile::tempdir().unwrap();
        let logger = file_logger(&dir, "task");

        assert!(current().is_none());
        let name = scope(logger, async { current().map(|l| l.name().to_string()) }).await;
        assert_eq!(name.as_deref(), Some("task"));
        assert!(current().is_none());
    }
}
