use crate::bond::BondOrder;
use crate::element::Element;

pub trait HasElement {
    fn element(&self) -> Element;
}

pub trait HasBondOrder {
    fn bond_order(&self) -> BondOrder;
}

pub trait HasBondOrderMut: HasBondOrder {
    fn bond_order_mut(&mut self) -> &mut BondOrder;
}
