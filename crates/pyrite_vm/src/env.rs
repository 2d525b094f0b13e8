//! Module namespace used during execution.

use std::collections::HashMap;
use std::sync::Arc;

use crate::builtins::Builtins;
use crate::value::Value;

/// Global bindings for one run plus the builtins visible to it.
///
/// Lookups consult the globals first and fall back to builtins, so a script
/// may shadow `print` with its own binding.
#[derive(Debug, Clone)]
pub struct Environment {
    globals: HashMap<String, Value>,
    builtins: Arc<Builtins>,
}

impl Environment {
    /// Creates a namespace seeded with `__name__` and `__file__`.
    pub fn new(module_name: &str, source_identity: &str, builtins: Arc<Builtins>) -> Self {
        let mut globals = HashMap::new();
        globals.insert("__name__".to_string(), Value::str(module_name));
        globals.insert("__file__".to_string(), Value::str(source_identity));
        Self { globals, builtins }
    }

    /// Resolves a name: globals, then builtins.
    pub fn lookup(&self, name: &str) -> Option<Value> {
        self.globals
            .get(name)
            .cloned()
            .or_else(|| self.builtins.get(name).map(Value::Builtin))
    }

    /// Returns a global binding without consulting builtins.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.globals.get(name)
    }

    /// Binds a global.
    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.globals.insert(name.into(), value);
    }

    /// All global bindings.
    pub fn globals(&self) -> &HashMap<String, Value> {
        &self.globals
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env() -> Environment {
        Environment::new("__main__", "script.py", Arc::new(Builtins::standard()))
    }

    #[test]
    fn seeded_with_module_identity() {
        let env = env();
        assert_eq!(env.get("__name__"), Some(&Value::str("__main__")));
        assert_eq!(env.get("__file__"), Some(&Value::str("script.py")));
    }

    #[test]
    fn lookup_falls_back_to_builtins() {
        let env = env();
        assert!(matches!(env.lookup("print"), Some(Value::Builtin(b)) if b.name() == "print"));
        assert_eq!(env.get("print"), None);
        assert_eq!(env.lookup("nope"), None);
    }

    #[test]
    fn globals_shadow_builtins() {
        let mut env = env();
        env.set("len", Value::int(3));
        assert_eq!(env.lookup("len"), Some(Value::int(3)));
    }
}
