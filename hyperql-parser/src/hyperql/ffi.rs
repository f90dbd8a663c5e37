//! C export of the language descriptor
//!
//!     `tree_sitter_hyperql` is the one symbol C and C++ callers link against, declared in
//!     `bindings/c/tree_sitter/tree-sitter-hyperql.h`. It hands out the address of the
//!     descriptor singleton as an opaque `TSLanguage` pointer. There is no matching free
//!     function: the descriptor lives for the whole process.

use crate::hyperql::language::language;

/// Opaque handle type; C sees it as an incomplete struct.
#[repr(C)]
pub struct TSLanguage {
    _private: [u8; 0],
}

/// Return the HyperQL language descriptor. Never null, the same pointer on every call.
#[no_mangle]
pub extern "C" fn tree_sitter_hyperql() -> *const TSLanguage {
    language().as_raw()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hyperql::language::Language;

    #[test]
    fn test_pointer_is_stable() {
        let first = tree_sitter_hyperql();
        assert!(!first.is_null());
        assert_eq!(first, tree_sitter_hyperql());
    }

    #[test]
    fn test_pointer_round_trips() {
        let lang = unsafe { Language::from_raw(tree_sitter_hyperql()) }.unwrap();
        assert!(std::ptr::eq(lang, language()));
        assert!(unsafe { Language::from_raw(std::ptr::null()) }.is_none());
    }

    #[test]
    fn test_concurrent_callers_agree() {
        let addresses: Vec<usize> = (0..8)
            .map(|_| std::thread::spawn(|| tree_sitter_hyperql() as usize))
            .collect::<Vec<_>>()
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect();
        assert!(addresses.windows(2).all(|pair| pair[0] == pair[1]));
    }
}
