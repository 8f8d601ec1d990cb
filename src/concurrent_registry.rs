use crate::custom::{CustomFunction, CustomFunctionAdapter};
use crate::error::Error;
use crate::runtime::builtin_functions::register_builtins;
use crate::traits::Function;
use dashmap::DashMap;
use std::sync::Arc;

/// Case-insensitive function table shared across threads.
/// Uses DashMap so concurrent evaluations read without a global lock.
#[derive(Default)]
pub struct FunctionRegistry {
    functions: DashMap<String, Arc<dyn Function>>,
}

impl FunctionRegistry {
    /// Create a new empty function registry
    pub fn new() -> Self {
        Self {
            functions: DashMap::new(),
        }
    }

    /// Create a registry holding every built-in function
    pub fn with_builtins() -> Self {
        let registry = Self::new();
        register_builtins(&registry);
        registry
    }

    /// Register a function, replacing any previous one with the same name
    pub fn register(&self, function: Arc<dyn Function>) -> Result<(), Error> {
        let name = function.name().to_uppercase();
        if name.is_empty() {
            return Err(Error::new("Function name cannot be empty", None));
        }
        tracing::debug!(function = %name, pure = function.is_pure(), "registering function");
        self.functions.insert(name, function);
        Ok(())
    }

    /// Register a custom function written against [`CustomFunction`]
    pub fn register_custom(&self, function: Box<dyn CustomFunction>) -> Result<(), Error> {
        let adapter = CustomFunctionAdapter::new(function)?;
        self.register(Arc::new(adapter))
    }

    /// Get a function by name (case-insensitive)
    pub fn get(&self, name: &str) -> Option<Arc<dyn Function>> {
        self.functions
            .get(&name.to_uppercase())
            .map(|entry| Arc::clone(entry.value()))
    }

    /// Check if a function is registered
    pub fn has_function(&self, name: &str) -> bool {
        self.functions.contains_key(&name.to_uppercase())
    }

    /// Remove a function by name
    pub fn unregister(&self, name: &str) -> bool {
        self.functions.remove(&name.to_uppercase()).is_some()
    }

    /// List all function names, sorted
    pub fn list_functions(&self) -> Vec<String> {
        let mut names: Vec<String> = self.functions.iter().map(|entry| entry.key().clone()).collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}
