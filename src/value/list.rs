use super::{ArrayNodeHandle, ObjectNodeHandle, Reference, ValueArena, ValueHandle};

/// Forward iterator over an array's linked-list nodes, yielding each
/// element's [`ValueHandle`].
pub struct ArrayIter<'arena, 'a> {
    arena: &'arena ValueArena<'a>,
    cursor: Option<ArrayNodeHandle>,
}

impl<'arena, 'a> ArrayIter<'arena, 'a> {
    pub fn new(arena: &'arena ValueArena<'a>, head: Option<ArrayNodeHandle>) -> Self {
        Self {
            arena,
            cursor: head,
        }
    }
}

impl<'arena, 'a> Iterator for ArrayIter<'arena, 'a> {
    type Item = ValueHandle;

    fn next(&mut self) -> Option<Self::Item> {
        let node_handle = self.cursor?;
        let node = self.arena.array_node(node_handle);
        self.cursor = node.next;
        Some(node.value)
    }
}

/// Forward iterator over an object's linked-list nodes, yielding each
/// entry's `(key, value)` pair.
pub struct ObjectIter<'arena, 'a> {
    arena: &'arena ValueArena<'a>,
    cursor: Option<ObjectNodeHandle>,
}

impl<'arena, 'a> ObjectIter<'arena, 'a> {
    pub fn new(arena: &'arena ValueArena<'a>, head: Option<ObjectNodeHandle>) -> Self {
        Self {
            arena,
            cursor: head,
        }
    }
}

impl<'arena, 'a> Iterator for ObjectIter<'arena, 'a> {
    type Item = (&'arena Reference<'a>, ValueHandle);

    fn next(&mut self) -> Option<Self::Item> {
        let node_handle = self.cursor?;
        let node = self.arena.object_node(node_handle);
        self.cursor = node.next;
        Some((&node.key, node.value))
    }
}

impl<'a> ValueArena<'a> {
    pub fn iter_array(&self, array: ValueHandle) -> ArrayIter<'_, 'a> {
        match self.get(array) {
            super::Value::Array(arr) => ArrayIter::new(self, arr.head),
            _ => ArrayIter::new(self, None),
        }
    }

    pub fn iter_object(&self, object: ValueHandle) -> ObjectIter<'_, 'a> {
        match self.get(object) {
            super::Value::Object(obj) => ObjectIter::new(self, obj.head),
            _ => ObjectIter::new(self, None),
        }
    }

    pub fn array_len(&self, array: ValueHandle) -> usize {
        self.iter_array(array).count()
    }
}
