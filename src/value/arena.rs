use super::{
    ArrayNode, ArrayNodeHandle, ArrayValue, Closure, EnvArena, EnvFrame, EnvHandle, ObjectNode,
    ObjectNodeHandle, ObjectValue, Reference, Value, ValueArena, ValueHandle,
};
use std::fmt::{Debug, Formatter};
use std::rc::Rc;

impl<'a> Reference<'a> {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Reference::Borrowed(b) => b,
            Reference::Owned(r) => r,
        }
    }

    pub fn as_str(&self) -> &str {
        std::str::from_utf8(self.as_bytes()).unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }

    pub fn owned(bytes: impl Into<Vec<u8>>) -> Self {
        Reference::Owned(Rc::from(bytes.into().into_boxed_slice()))
    }

    pub fn is_owned(&self) -> bool {
        matches!(self, Reference::Owned(_))
    }
}

impl<'a> PartialEq for Reference<'a> {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}
impl<'a> Eq for Reference<'a> {}

impl<'a> Debug for ValueArena<'a> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValueArena")
            .field("values", &self.values.len())
            .field("array_nodes", &self.array_nodes.len())
            .field("object_nodes", &self.object_nodes.len())
            .finish()
    }
}

impl<'a> ValueArena<'a> {
    pub fn new(source: &'a [u8]) -> Self {
        Self {
            source,
            values: Vec::new(),
            array_nodes: Vec::new(),
            object_nodes: Vec::new(),
        }
    }

    pub fn source(&self) -> &'a [u8] {
        self.source
    }

    pub fn get(&self, handle: ValueHandle) -> &Value<'a> {
        &self.values[handle.0]
    }

    pub fn get_mut(&mut self, handle: ValueHandle) -> &mut Value<'a> {
        &mut self.values[handle.0]
    }

    pub fn array_node(&self, handle: ArrayNodeHandle) -> &ArrayNode {
        &self.array_nodes[handle.0]
    }

    pub fn object_node(&self, handle: ObjectNodeHandle) -> &ObjectNode<'a> {
        &self.object_nodes[handle.0]
    }

    /// Allocate a new value node, returning its handle. Allocation here
    /// can never fail (a `Vec` grows), so stack-depth limits are enforced
    /// by the iterative parser's explicit depth counter, not here.
    pub fn alloc(&mut self, value: Value<'a>) -> ValueHandle {
        self.values.push(value);
        ValueHandle(self.values.len() - 1)
    }

    fn alloc_array_node(&mut self, node: ArrayNode) -> ArrayNodeHandle {
        self.array_nodes.push(node);
        ArrayNodeHandle(self.array_nodes.len() - 1)
    }

    fn alloc_object_node(&mut self, node: ObjectNode<'a>) -> ObjectNodeHandle {
        self.object_nodes.push(node);
        ObjectNodeHandle(self.object_nodes.len() - 1)
    }

    pub fn empty_array(&mut self) -> ValueHandle {
        self.alloc(Value::Array(ArrayValue {
            head: None,
            tail: None,
        }))
    }

    pub fn empty_object(&mut self) -> ValueHandle {
        self.alloc(Value::Object(ObjectValue {
            head: None,
            tail: None,
        }))
    }

    /// Append `value` to the array at `array`. O(1): preserves the
    /// head/tail invariant where `tail` is only populated once a second
    /// node exists.
    pub fn array_push(&mut self, array: ValueHandle, value: ValueHandle) {
        let node = self.alloc_array_node(ArrayNode { value, next: None });
        let arr = match self.get_mut(array) {
            Value::Array(arr) => arr,
            _ => panic!("array_push called on a non-array value"),
        };
        match (arr.head, arr.tail) {
            (None, _) => arr.head = Some(node),
            (Some(head), None) => {
                self.array_nodes[head.0].next = Some(node);
                if let Value::Array(arr) = self.get_mut(array) {
                    arr.tail = Some(node);
                }
            }
            (Some(_), Some(tail)) => {
                self.array_nodes[tail.0].next = Some(node);
                if let Value::Array(arr) = self.get_mut(array) {
                    arr.tail = Some(node);
                }
            }
        }
    }

    /// Append a `(key, value)` entry to the object at `object`. Same
    /// head/tail discipline as [`Self::array_push`].
    pub fn object_push(&mut self, object: ValueHandle, key: Reference<'a>, value: ValueHandle) {
        let node = self.alloc_object_node(ObjectNode {
            key,
            value,
            next: None,
        });
        let obj = match self.get_mut(object) {
            Value::Object(obj) => obj,
            _ => panic!("object_push called on a non-object value"),
        };
        match (obj.head, obj.tail) {
            (None, _) => obj.head = Some(node),
            (Some(head), None) => {
                self.object_nodes[head.0].next = Some(node);
                if let Value::Object(obj) = self.get_mut(object) {
                    obj.tail = Some(node);
                }
            }
            (Some(_), Some(tail)) => {
                self.object_nodes[tail.0].next = Some(node);
                if let Value::Object(obj) = self.get_mut(object) {
                    obj.tail = Some(node);
                }
            }
        }
    }

    pub fn object_get(&self, object: ValueHandle, key: &[u8]) -> Option<ValueHandle> {
        let obj = match self.get(object) {
            Value::Object(obj) => *obj,
            _ => return None,
        };
        let mut cursor = obj.head;
        while let Some(node_handle) = cursor {
            let node = self.object_node(node_handle);
            if node.key.as_bytes() == key {
                return Some(node.value);
            }
            cursor = node.next;
        }
        None
    }

    pub fn object_has_key(&self, object: ValueHandle, key: &[u8]) -> bool {
        self.object_get(object, key).is_some()
    }

    /// Deep-copy `value` (and, transitively, every container/closure it
    /// reaches) within this same arena, preserving the reference bytes
    /// verbatim. Used by `quote`, `define`, literal self-evaluation, and
    /// `list`: every non-container, non-symbol tag evaluates to a deep
    /// copy of itself.
    pub fn deep_copy(&mut self, value: ValueHandle) -> ValueHandle {
        match self.get(value).clone() {
            Value::Null => self.alloc(Value::Null),
            Value::Boolean(r) => self.alloc(Value::Boolean(r)),
            Value::Number(r) => self.alloc(Value::Number(r)),
            Value::String(r) => self.alloc(Value::String(r)),
            Value::Symbol(r) => self.alloc(Value::Symbol(r)),
            Value::Array(arr) => {
                let new_array = self.empty_array();
                let mut cursor = arr.head;
                while let Some(node_handle) = cursor {
                    let node = *self.array_node(node_handle);
                    let copied = self.deep_copy(node.value);
                    self.array_push(new_array, copied);
                    cursor = node.next;
                }
                new_array
            }
            Value::Object(obj) => {
                let new_object = self.empty_object();
                let mut cursor = obj.head;
                while let Some(node_handle) = cursor {
                    let node = self.object_node(node_handle).clone();
                    let copied = self.deep_copy(node.value);
                    self.object_push(new_object, node.key, copied);
                    cursor = node.next;
                }
                new_object
            }
            Value::Closure(closure) => {
                let params = self.deep_copy(closure.params);
                let body = self.deep_copy(closure.body);
                self.alloc(Value::Closure(Closure {
                    params,
                    body,
                    env: closure.env,
                }))
            }
        }
    }

    /// O(1) bulk reclaim: drop every allocated node without walking the
    /// graph. Matches the C pool's `json_reset`.
    pub fn reset(&mut self) {
        self.values.clear();
        self.array_nodes.clear();
        self.object_nodes.clear();
    }

    /// Like [`Self::reset`], but also releases the underlying storage
    /// instead of just truncating it, matching `json_cleanup`'s
    /// zero-and-reset intent (Rust has no use-after-free hazard to guard
    /// against here, so there is nothing to literally zero).
    pub fn cleanup(&mut self) {
        self.values = Vec::new();
        self.array_nodes = Vec::new();
        self.object_nodes = Vec::new();
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }
}

impl<'a> EnvArena<'a> {
    pub fn new() -> Self {
        Self { frames: Vec::new() }
    }

    pub fn create(&mut self, parent: Option<EnvHandle>) -> EnvHandle {
        self.frames.push(EnvFrame {
            bindings: Vec::new(),
            parent,
        });
        EnvHandle(self.frames.len() - 1)
    }

    pub fn define(&mut self, env: EnvHandle, name: Reference<'a>, value: ValueHandle) {
        let frame = &mut self.frames[env.0];
        if let Some(slot) = frame
            .bindings
            .iter_mut()
            .find(|(existing, _)| existing.as_bytes() == name.as_bytes())
        {
            slot.1 = value;
        } else {
            frame.bindings.push((name, value));
        }
    }

    /// Walk the frame chain looking up `name`.
    pub fn lookup(&self, env: EnvHandle, name: &[u8]) -> Option<ValueHandle> {
        let mut current = Some(env);
        while let Some(handle) = current {
            let frame = &self.frames[handle.0];
            if let Some((_, value)) = frame
                .bindings
                .iter()
                .rev()
                .find(|(existing, _)| existing.as_bytes() == name)
            {
                return Some(*value);
            }
            current = frame.parent;
        }
        None
    }

    /// Update the nearest enclosing binding of `name`, returning `false`
    /// if it is unbound anywhere in the chain. Backs the `set!` special form.
    pub fn set(&mut self, env: EnvHandle, name: &[u8], value: ValueHandle) -> bool {
        let mut current = Some(env);
        while let Some(handle) = current {
            let frame = &mut self.frames[handle.0];
            if let Some(slot) = frame
                .bindings
                .iter_mut()
                .rev()
                .find(|(existing, _)| existing.as_bytes() == name)
            {
                slot.1 = value;
                return true;
            }
            current = frame.parent;
        }
        false
    }

    pub fn reset(&mut self) {
        self.frames.clear();
    }
}

impl<'a> Default for EnvArena<'a> {
    fn default() -> Self {
        Self::new()
    }
}
