//! Capability tables: explicit accessor registration per item type.
//!
//! Instead of resolving method names through reflection at call time, each
//! item type registers its getters, setters, initializers and actions here,
//! keyed by the method names its XML model refers to. The typed `fn` pointers
//! are erased into thunks over `&dyn HomeItem`; a thunk downcasts back to the
//! registering type before calling through, and reports a model error if the
//! item is of another type.
//!
//! Binding an XML model against a table happens once, when the model is
//! built; a method name the table does not know is rejected there, not when
//! the attribute or action is used.

use std::collections::HashMap;
use std::sync::Arc;

use nethome_core::value::Value;

use crate::error::{DispatchError, ItemError, ModelError};
use crate::item::HomeItem;

pub(crate) type GetterThunk =
    Arc<dyn Fn(&dyn HomeItem) -> Result<Value, DispatchError> + Send + Sync>;
pub(crate) type SetterThunk =
    Arc<dyn Fn(&mut dyn HomeItem, &Value) -> Result<(), DispatchError> + Send + Sync>;
pub(crate) type ActionThunk =
    Arc<dyn Fn(&mut dyn HomeItem) -> Result<String, DispatchError> + Send + Sync>;

/// Accessor registry for one item type.
#[derive(Default)]
pub struct CapabilityTable {
    getters: HashMap<&'static str, GetterThunk>,
    setters: HashMap<&'static str, SetterThunk>,
    initializers: HashMap<&'static str, SetterThunk>,
    actions: HashMap<&'static str, ActionThunk>,
}

fn downcast_ref<'a, T: HomeItem>(
    item: &'a dyn HomeItem,
    method: &'static str,
) -> Result<&'a T, DispatchError> {
    item.as_any()
        .downcast_ref::<T>()
        .ok_or_else(|| ModelError::WrongItemType(method.to_string()).into())
}

fn downcast_mut<'a, T: HomeItem>(
    item: &'a mut dyn HomeItem,
    method: &'static str,
) -> Result<&'a mut T, DispatchError> {
    item.as_any_mut()
        .downcast_mut::<T>()
        .ok_or_else(|| ModelError::WrongItemType(method.to_string()).into())
}

impl CapabilityTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a get method.
    pub fn getter<T: HomeItem>(&mut self, method: &'static str, f: fn(&T) -> Value) -> &mut Self {
        self.getters.insert(
            method,
            Arc::new(move |item| Ok(f(downcast_ref::<T>(item, method)?))),
        );
        self
    }

    /// Register a set method. The function may reject the value with
    /// [`ItemError::IllegalValue`], which propagates to the caller.
    pub fn setter<T: HomeItem>(
        &mut self,
        method: &'static str,
        f: fn(&mut T, &Value) -> Result<(), ItemError>,
    ) -> &mut Self {
        self.setters.insert(
            method,
            Arc::new(move |item, value| Ok(f(downcast_mut::<T>(item, method)?, value)?)),
        );
        self
    }

    /// Register an init method, used only during the construction window.
    pub fn initializer<T: HomeItem>(
        &mut self,
        method: &'static str,
        f: fn(&mut T, &Value) -> Result<(), ItemError>,
    ) -> &mut Self {
        self.initializers.insert(
            method,
            Arc::new(move |item, value| Ok(f(downcast_mut::<T>(item, method)?, value)?)),
        );
        self
    }

    /// Register an action method. The returned string is the action's result
    /// (often empty); failures surface as [`ItemError::ExecutionFailure`].
    pub fn action<T: HomeItem>(
        &mut self,
        method: &'static str,
        f: fn(&mut T) -> Result<String, ItemError>,
    ) -> &mut Self {
        self.actions.insert(
            method,
            Arc::new(move |item| Ok(f(downcast_mut::<T>(item, method)?)?)),
        );
        self
    }

    pub fn has_getter(&self, method: &str) -> bool {
        self.getters.contains_key(method)
    }

    pub fn has_setter(&self, method: &str) -> bool {
        self.setters.contains_key(method)
    }

    pub fn has_initializer(&self, method: &str) -> bool {
        self.initializers.contains_key(method)
    }

    pub fn has_action(&self, method: &str) -> bool {
        self.actions.contains_key(method)
    }

    pub(crate) fn getter_thunk(&self, method: &str) -> Option<GetterThunk> {
        self.getters.get(method).cloned()
    }

    pub(crate) fn setter_thunk(&self, method: &str) -> Option<SetterThunk> {
        self.setters.get(method).cloned()
    }

    pub(crate) fn initializer_thunk(&self, method: &str) -> Option<SetterThunk> {
        self.initializers.get(method).cloned()
    }

    pub(crate) fn action_thunk(&self, method: &str) -> Option<ActionThunk> {
        self.actions.get(method).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::any::Any;

    struct Counter {
        count: i64,
    }

    impl HomeItem for Counter {
        fn model_xml(&self) -> &str {
            ""
        }

        fn capabilities(&self) -> CapabilityTable {
            let mut table = CapabilityTable::new();
            table
                .getter::<Counter>("getCount", |c| Value::Integer(c.count))
                .setter::<Counter>("setCount", |c, v| {
                    match v.as_i64() {
                        Some(n) if n >= 0 => {
                            c.count = n;
                            Ok(())
                        }
                        _ => Err(ItemError::illegal_value("Count", v.marshal())),
                    }
                })
                .action::<Counter>("increment", |c| {
                    c.count += 1;
                    Ok(String::new())
                });
            table
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    struct Other;

    impl HomeItem for Other {
        fn model_xml(&self) -> &str {
            ""
        }

        fn capabilities(&self) -> CapabilityTable {
            CapabilityTable::new()
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    #[test]
    fn test_getter_and_action_dispatch() {
        let mut counter = Counter { count: 5 };
        let table = counter.capabilities();

        let get = table.getter_thunk("getCount").unwrap();
        assert_eq!(get(&counter).unwrap(), Value::Integer(5));

        let action = table.action_thunk("increment").unwrap();
        action(&mut counter).unwrap();
        assert_eq!(get(&counter).unwrap(), Value::Integer(6));
    }

    #[test]
    fn test_setter_rejects_domain_error() {
        let mut counter = Counter { count: 0 };
        let table = counter.capabilities();
        let set = table.setter_thunk("setCount").unwrap();

        let err = set(&mut counter, &Value::Integer(-1)).unwrap_err();
        assert!(matches!(
            err,
            DispatchError::Item(ItemError::IllegalValue { .. })
        ));
        assert_eq!(counter.count, 0);
    }

    #[test]
    fn test_wrong_item_type_is_model_error() {
        let counter = Counter { count: 0 };
        let table = counter.capabilities();
        let get = table.getter_thunk("getCount").unwrap();

        let other = Other;
        let err = get(&other).unwrap_err();
        assert!(matches!(
            err,
            DispatchError::Model(ModelError::WrongItemType(_))
        ));
    }

    #[test]
    fn test_unregistered_method_is_absent() {
        let counter = Counter { count: 0 };
        let table = counter.capabilities();
        assert!(!table.has_getter("getMissing"));
        assert!(table.getter_thunk("getMissing").is_none());
    }
}
