use std::hash::Hash;
use std::rc::Rc;

use crate::hash::StructuralKey;

/// Caches a derived value and recomputes it only when the input changes.
///
/// The structural key rejects most differing inputs cheaply; the stored input
/// settles the rest, so a hash collision never hands back a stale value. A
/// freshly built but equal input gets the very same `Rc` as before.
pub struct Memo<I, T> {
    input: Option<(StructuralKey, I)>,
    value: Option<Rc<T>>,
}

impl<I, T> Memo<I, T>
where
    I: Hash + PartialEq + Clone,
{
    pub fn new() -> Self {
        Self {
            input: None,
            value: None,
        }
    }

    /// Returns the cached value and whether it was recomputed.
    pub fn get_or_compute(&mut self, input: &I, compute: impl FnOnce(&I) -> T) -> (Rc<T>, bool) {
        let key = StructuralKey::of(input);
        if let (Some((current, previous)), Some(value)) = (&self.input, &self.value) {
            if *current == key && previous == input {
                return (Rc::clone(value), false);
            }
        }
        let value = Rc::new(compute(input));
        self.input = Some((key, input.clone()));
        self.value = Some(Rc::clone(&value));
        (value, true)
    }

    pub fn value(&self) -> Option<Rc<T>> {
        self.value.clone()
    }
}

impl<I, T> Default for Memo<I, T>
where
    I: Hash + PartialEq + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::hash::Hasher;

    #[test]
    fn equal_input_returns_same_value() {
        let mut memo = Memo::new();
        let mut calls = 0;
        let (first, computed) = memo.get_or_compute(&vec!["a".to_owned()], |input| {
            calls += 1;
            input.len()
        });
        assert!(computed);

        let (second, computed) = memo.get_or_compute(&vec!["a".to_owned()], |input| {
            calls += 1;
            input.len()
        });
        assert!(!computed);
        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(calls, 1);

        let next = vec!["b".to_owned(), "c".to_owned()];
        let (third, computed) = memo.get_or_compute(&next, |input| input.len());
        assert!(computed);
        assert_eq!(*third, 2);
        assert!(Rc::ptr_eq(&third, &memo.value().unwrap()));
    }

    /// Every value hashes alike, so only equality tells inputs apart.
    #[derive(Clone, PartialEq)]
    struct Colliding(u32);

    impl Hash for Colliding {
        fn hash<H: Hasher>(&self, _state: &mut H) {}
    }

    #[test]
    fn colliding_keys_still_recompute() {
        let mut memo = Memo::new();
        let (first, _) = memo.get_or_compute(&Colliding(1), |input| input.0);
        let (second, computed) = memo.get_or_compute(&Colliding(2), |input| input.0);

        assert!(computed);
        assert_eq!((*first, *second), (1, 2));

        let (_, computed) = memo.get_or_compute(&Colliding(2), |input| input.0);
        assert!(!computed);
    }
}
