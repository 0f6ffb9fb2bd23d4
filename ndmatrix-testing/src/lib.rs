//! Internal testing utilities for the ndmatrix crates.

use std::fmt::Debug;
use std::panic::{RefUnwindSafe, UnwindSafe};

/// Utility for creating parametrized (aka. table-driven) tests.
///
/// To create a table driven test:
///
/// 1. Import the `TestCases` trait
/// 2. Create a struct, conventionally named `Case`, that contains the data
///    for a single test case. This struct must implement `Debug`.
/// 3. Create a collection of `Case` instances (eg. an array or Vec),
///    conventionally named `cases`.
/// 4. Call `cases.test_each`, passing the test function as a closure
///
/// `test_each` runs every case, catching any panics. If all cases run
/// without panicking it returns, otherwise it panics with a message that
/// includes the count and debug representations of the failing cases.
///
/// ## Example
///
/// ```
/// use ndmatrix_testing::TestCases;
///
/// // Add #[test] attribute
/// fn test_multiply() {
///   #[derive(Debug)]
///   struct Case {
///     a: i32,
///     b: i32,
///     expected: i32,
///   }
///
///   let cases = [
///     Case { a: 3, b: 5, expected: 15 },
///   ];
///
///   cases.test_each(|&Case { a, b, expected }| {
///     assert_eq!(a * b, expected);
///   });
/// }
/// # test_multiply();
/// ```
///
/// Test cases and the test function must be
/// [unwind safe](https://doc.rust-lang.org/std/panic/fn.catch_unwind.html).
/// Practically this means they must not contain interior mutability. If a
/// case holds a value that is not unwind safe, pass it by value using
/// [`test_each_value`](TestCases::test_each_value), or describe how to
/// create the value in the case and build it inside the test function.
pub trait TestCases {
    /// The data for a single test case.
    type Case;

    /// Call test function `test` with each test case in `self`, catching any
    /// panics.
    ///
    /// After all cases have been evaluated, return if no panics occurred or
    /// panic with details of failing cases otherwise.
    fn test_each(self, test: impl Fn(&Self::Case) + RefUnwindSafe)
    where
        Self::Case: Debug + RefUnwindSafe;

    /// Variant of [`test_each`](TestCases::test_each) which passes test cases
    /// to the test function by value.
    ///
    /// Each case is formatted to a string up front so a debug representation
    /// is still available if the test panics. This adds a small amount of
    /// overhead compared to [`test_each`](TestCases::test_each).
    fn test_each_value(self, test: impl Fn(Self::Case) + RefUnwindSafe)
    where
        Self::Case: Debug + UnwindSafe;
}

impl<I: IntoIterator> TestCases for I {
    type Case = I::Item;

    fn test_each(self, test: impl Fn(&I::Item) + RefUnwindSafe)
    where
        Self::Case: Debug + RefUnwindSafe,
    {
        let mut failures = Vec::new();
        for case in self {
            if std::panic::catch_unwind(|| {
                test(&case);
            })
            .is_err()
            {
                failures.push(format!("{:?}", case));
            }
        }
        assert_eq!(
            failures.len(),
            0,
            "{} test cases failed: {:?}",
            failures.len(),
            failures
        );
    }

    fn test_each_value(self, test: impl Fn(I::Item) + RefUnwindSafe)
    where
        Self::Case: Debug + UnwindSafe,
    {
        let mut failures = Vec::new();
        for case in self {
            let test = &test;
            let case_str = format!("{:?}", case);

            if std::panic::catch_unwind(move || {
                test(case);
            })
            .is_err()
            {
                failures.push(case_str);
            }
        }
        assert_eq!(
            failures.len(),
            0,
            "{} test cases failed: {:?}",
            failures.len(),
            failures
        );
    }
}
