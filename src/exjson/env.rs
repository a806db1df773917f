//! Environment frame API: a thin, named wrapper over [`EnvArena`] so
//! callers get a fixed verb set (`env_create`, `env_lookup`, ...) instead
//! of reaching into arena internals directly.

use crate::value::{EnvArena, EnvHandle, Reference, ValueHandle};

/// Create a new, empty frame as a child of `parent` (or a root frame if
/// `parent` is `None`).
pub fn env_create(arena: &mut EnvArena, parent: Option<EnvHandle>) -> EnvHandle {
    arena.create(parent)
}

/// Frames are arena-owned; freeing one here is bookkeeping only; the
/// arena itself reclaims all frames on `reset`, matching the value
/// arena's story.
pub fn env_free(_arena: &mut EnvArena, _env: EnvHandle) {}

pub fn env_lookup(arena: &EnvArena, env: EnvHandle, name: &[u8]) -> Option<ValueHandle> {
    arena.lookup(env, name)
}

pub fn env_define<'a>(arena: &mut EnvArena<'a>, env: EnvHandle, name: Reference<'a>, value: ValueHandle) {
    arena.define(env, name, value)
}

pub fn env_set(arena: &mut EnvArena, env: EnvHandle, name: &[u8], value: ValueHandle) -> bool {
    arena.set(env, name, value)
}

/// The root frame a fresh evaluator session starts from. Builtins are
/// dispatched ahead of environment lookup, so the global frame starts
/// empty rather than pre-populated with builtin closures.
pub fn create_global_env(arena: &mut EnvArena) -> EnvHandle {
    arena.create(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Reference;

    #[test]
    fn child_frame_sees_parent_bindings() {
        let mut values = crate::value::ValueArena::new(b"");
        let marker = values.alloc(crate::value::Value::Null);
        let mut arena = EnvArena::new();
        let root = create_global_env(&mut arena);
        env_define(&mut arena, root, Reference::Borrowed(b"x"), marker);
        let child = env_create(&mut arena, Some(root));
        assert!(env_lookup(&arena, child, b"x").is_some());
    }
}
