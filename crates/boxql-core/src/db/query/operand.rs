//! Typed condition operands.
//!
//! Each trait admits exactly the value types its operation supports and
//! routes every type to its own engine entry point. The traits are sealed,
//! so the coverage cannot grow outside this module.
use crate::{
    engine::{ContextHandle, EngineBinding, EngineError, EngineOp},
    model::PropertyId,
};

mod sealed {
    pub trait Sealed {}

    impl Sealed for i64 {}
    impl Sealed for f64 {}
    impl Sealed for &str {}
    impl Sealed for String {}
    impl Sealed for &[i32] {}
    impl Sealed for &[i64] {}
    impl Sealed for &Vec<i32> {}
    impl Sealed for &Vec<i64> {}
    impl<const N: usize> Sealed for &[i32; N] {}
    impl<const N: usize> Sealed for &[i64; N] {}
}

///
/// EqualOperand
/// Operand of `equal` / `not_equal`: 64-bit integers and text.
///

pub trait EqualOperand: sealed::Sealed {
    #[doc(hidden)]
    const EQUAL: EngineOp;
    #[doc(hidden)]
    const NOT_EQUAL: EngineOp;

    #[doc(hidden)]
    fn forward_equal(
        self,
        engine: &dyn EngineBinding,
        context: ContextHandle,
        property: PropertyId,
    ) -> Result<(), EngineError>;

    #[doc(hidden)]
    fn forward_not_equal(
        self,
        engine: &dyn EngineBinding,
        context: ContextHandle,
        property: PropertyId,
    ) -> Result<(), EngineError>;
}

impl EqualOperand for i64 {
    const EQUAL: EngineOp = EngineOp::EqualInt;
    const NOT_EQUAL: EngineOp = EngineOp::NotEqualInt;

    fn forward_equal(
        self,
        engine: &dyn EngineBinding,
        context: ContextHandle,
        property: PropertyId,
    ) -> Result<(), EngineError> {
        engine.equal_int(context, property, self)
    }

    fn forward_not_equal(
        self,
        engine: &dyn EngineBinding,
        context: ContextHandle,
        property: PropertyId,
    ) -> Result<(), EngineError> {
        engine.not_equal_int(context, property, self)
    }
}

impl EqualOperand for &str {
    const EQUAL: EngineOp = EngineOp::EqualText;
    const NOT_EQUAL: EngineOp = EngineOp::NotEqualText;

    fn forward_equal(
        self,
        engine: &dyn EngineBinding,
        context: ContextHandle,
        property: PropertyId,
    ) -> Result<(), EngineError> {
        engine.equal_text(context, property, self)
    }

    fn forward_not_equal(
        self,
        engine: &dyn EngineBinding,
        context: ContextHandle,
        property: PropertyId,
    ) -> Result<(), EngineError> {
        engine.not_equal_text(context, property, self)
    }
}

impl EqualOperand for String {
    const EQUAL: EngineOp = EngineOp::EqualText;
    const NOT_EQUAL: EngineOp = EngineOp::NotEqualText;

    fn forward_equal(
        self,
        engine: &dyn EngineBinding,
        context: ContextHandle,
        property: PropertyId,
    ) -> Result<(), EngineError> {
        engine.equal_text(context, property, &self)
    }

    fn forward_not_equal(
        self,
        engine: &dyn EngineBinding,
        context: ContextHandle,
        property: PropertyId,
    ) -> Result<(), EngineError> {
        engine.not_equal_text(context, property, &self)
    }
}

///
/// OrderOperand
/// Operand of `less` / `greater`: 64-bit integers and 64-bit floats. No text.
///

pub trait OrderOperand: sealed::Sealed {
    #[doc(hidden)]
    const LESS: EngineOp;
    #[doc(hidden)]
    const GREATER: EngineOp;

    #[doc(hidden)]
    fn forward_less(
        self,
        engine: &dyn EngineBinding,
        context: ContextHandle,
        property: PropertyId,
    ) -> Result<(), EngineError>;

    #[doc(hidden)]
    fn forward_greater(
        self,
        engine: &dyn EngineBinding,
        context: ContextHandle,
        property: PropertyId,
    ) -> Result<(), EngineError>;
}

impl OrderOperand for i64 {
    const LESS: EngineOp = EngineOp::LessInt;
    const GREATER: EngineOp = EngineOp::GreaterInt;

    fn forward_less(
        self,
        engine: &dyn EngineBinding,
        context: ContextHandle,
        property: PropertyId,
    ) -> Result<(), EngineError> {
        engine.less_int(context, property, self)
    }

    fn forward_greater(
        self,
        engine: &dyn EngineBinding,
        context: ContextHandle,
        property: PropertyId,
    ) -> Result<(), EngineError> {
        engine.greater_int(context, property, self)
    }
}

impl OrderOperand for f64 {
    const LESS: EngineOp = EngineOp::LessFloat;
    const GREATER: EngineOp = EngineOp::GreaterFloat;

    fn forward_less(
        self,
        engine: &dyn EngineBinding,
        context: ContextHandle,
        property: PropertyId,
    ) -> Result<(), EngineError> {
        engine.less_float(context, property, self)
    }

    fn forward_greater(
        self,
        engine: &dyn EngineBinding,
        context: ContextHandle,
        property: PropertyId,
    ) -> Result<(), EngineError> {
        engine.greater_float(context, property, self)
    }
}

///
/// MembershipOperand
///
/// Operand of `is_in`: a set of 32-bit or 64-bit integers. The two widths
/// reach different engine entry points and are never widened into each other.
///

pub trait MembershipOperand: sealed::Sealed {
    #[doc(hidden)]
    const OP: EngineOp;

    #[doc(hidden)]
    fn forward_in(
        self,
        engine: &dyn EngineBinding,
        context: ContextHandle,
        property: PropertyId,
    ) -> Result<(), EngineError>;
}

macro_rules! membership_operand {
    ($op:expr, $method:ident, [$($operand:ty),+ $(,)?]) => {
        $(
            impl MembershipOperand for $operand {
                const OP: EngineOp = $op;

                fn forward_in(
                    self,
                    engine: &dyn EngineBinding,
                    context: ContextHandle,
                    property: PropertyId,
                ) -> Result<(), EngineError> {
                    engine.$method(context, property, self)
                }
            }
        )+
    };
}

membership_operand!(EngineOp::InInt32, in_int32, [&[i32], &Vec<i32>]);
membership_operand!(EngineOp::InInt64, in_int64, [&[i64], &Vec<i64>]);

impl<const N: usize> MembershipOperand for &[i32; N] {
    const OP: EngineOp = EngineOp::InInt32;

    fn forward_in(
        self,
        engine: &dyn EngineBinding,
        context: ContextHandle,
        property: PropertyId,
    ) -> Result<(), EngineError> {
        engine.in_int32(context, property, self)
    }
}

impl<const N: usize> MembershipOperand for &[i64; N] {
    const OP: EngineOp = EngineOp::InInt64;

    fn forward_in(
        self,
        engine: &dyn EngineBinding,
        context: ContextHandle,
        property: PropertyId,
    ) -> Result<(), EngineError> {
        engine.in_int64(context, property, self)
    }
}
