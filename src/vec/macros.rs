/// Create a [`BoundedVec`](crate::vec::BoundedVec) containing the given
/// elements. The storage config is inferred from the target type.
///
/// ```
/// use bounded_alloc::{bounded_vec, vec::InlineVec};
///
/// let v: InlineVec<u32, 4> = bounded_vec![1, 2, 3];
/// assert_eq!(v, [1, 2, 3]);
/// let z: InlineVec<u32, 4> = bounded_vec![0; 4];
/// assert!(z.is_full());
/// ```
#[macro_export]
macro_rules! bounded_vec {
    () => (
        $crate::vec::BoundedVec::new()
    );
    ($elem:expr; $n:expr) => (
        $crate::vec::BoundedVec::from_elem($elem, $n)
    );
    ($($x:expr),+ $(,)?) => (
        $crate::vec::BoundedVec::from_array([$($x),+])
    );
}
