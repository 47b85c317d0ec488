//! Arithmetic operators for [`Quantity`].
//!
//! Binary operators return a new quantity whose metadata is inherited from
//! the quantity operand. When both operands are quantities the **left**
//! operand wins. Shapes co-broadcast as in `ndarray`; incompatible shapes
//! panic.
//!
//! Compound assignment (`+=`, `*=`, ...) mutates the payload in place and
//! leaves metadata alone. It is elementwise arithmetic, not value
//! replacement, so it does not consult the constant flag.

use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use crate::quantity::Quantity;

macro_rules! impl_binary_op {
    ($trait:ident, $method:ident, $op:tt) => {
        impl $trait<&Quantity> for &Quantity {
            type Output = Quantity;
            fn $method(self, rhs: &Quantity) -> Quantity {
                self.derive(&self.data $op &rhs.data)
            }
        }

        impl $trait<Quantity> for &Quantity {
            type Output = Quantity;
            fn $method(self, rhs: Quantity) -> Quantity {
                self $op &rhs
            }
        }

        impl $trait<&Quantity> for Quantity {
            type Output = Quantity;
            fn $method(self, rhs: &Quantity) -> Quantity {
                &self $op rhs
            }
        }

        impl $trait<Quantity> for Quantity {
            type Output = Quantity;
            fn $method(self, rhs: Quantity) -> Quantity {
                &self $op &rhs
            }
        }

        impl $trait<f64> for &Quantity {
            type Output = Quantity;
            fn $method(self, rhs: f64) -> Quantity {
                self.derive(&self.data $op rhs)
            }
        }

        impl $trait<f64> for Quantity {
            type Output = Quantity;
            fn $method(self, rhs: f64) -> Quantity {
                &self $op rhs
            }
        }

        impl $trait<&Quantity> for f64 {
            type Output = Quantity;
            fn $method(self, rhs: &Quantity) -> Quantity {
                rhs.map(|x| self $op x)
            }
        }

        impl $trait<Quantity> for f64 {
            type Output = Quantity;
            fn $method(self, rhs: Quantity) -> Quantity {
                self $op &rhs
            }
        }
    };
}

macro_rules! impl_assign_op {
    ($trait:ident, $method:ident, $op:tt) => {
        impl $trait<f64> for Quantity {
            fn $method(&mut self, rhs: f64) {
                self.data $op rhs;
            }
        }

        impl $trait<&Quantity> for Quantity {
            fn $method(&mut self, rhs: &Quantity) {
                self.data $op &rhs.data;
            }
        }

        impl $trait<Quantity> for Quantity {
            fn $method(&mut self, rhs: Quantity) {
                self.data $op &rhs.data;
            }
        }
    };
}

impl_binary_op!(Add, add, +);
impl_binary_op!(Sub, sub, -);
impl_binary_op!(Mul, mul, *);
impl_binary_op!(Div, div, /);

impl_assign_op!(AddAssign, add_assign, +=);
impl_assign_op!(SubAssign, sub_assign, -=);
impl_assign_op!(MulAssign, mul_assign, *=);
impl_assign_op!(DivAssign, div_assign, /=);

impl Neg for &Quantity {
    type Output = Quantity;
    fn neg(self) -> Quantity {
        self.map(|x| -x)
    }
}

impl Neg for Quantity {
    type Output = Quantity;
    fn neg(self) -> Quantity {
        -&self
    }
}
