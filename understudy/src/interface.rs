// vim: tw=80
//! Descriptions of the abstract types that mocks stand in for.
//!
//! Mocks don't need a description to work.  The catalog only matters when a
//! mock must know its members up front, as
//! [`Mock::setup_all_properties`](crate::Mock::setup_all_properties) does.

use std::{
    collections::HashMap,
    sync::Arc
};

use crate::{Error, Result, value::ValueType};

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Property {
    pub name: String,
    pub ty: ValueType,
}

/// An interface: a name and the properties it declares.
///
/// # Examples
/// ```
/// # use understudy::*;
/// let order = Interface::new("IOrder")
///     .with_property("Id", ValueType::Int)
///     .with_property("Customer", ValueType::interface("ICustomer"));
/// assert_eq!(2, order.properties().len());
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Interface {
    name: String,
    properties: Vec<Property>,
}

impl Interface {
    pub fn new(name: &str) -> Self {
        Interface {
            name: name.to_owned(),
            properties: Vec::new()
        }
    }

    pub fn with_property(mut self, name: &str, ty: ValueType) -> Self {
        self.properties.push(Property{name: name.to_owned(), ty});
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn properties(&self) -> &[Property] {
        &self.properties
    }
}

/// An immutable set of [`Interface`]s, shared by every mock built from it.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    interfaces: Arc<HashMap<String, Arc<Interface>>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, interface: Interface) -> Self {
        let mut interfaces = (*self.interfaces).clone();
        interfaces.insert(interface.name.clone(), Arc::new(interface));
        Catalog{interfaces: Arc::new(interfaces)}
    }

    pub fn get(&self, name: &str) -> Option<Arc<Interface>> {
        self.interfaces.get(name).cloned()
    }

    pub fn resolve(&self, name: &str) -> Result<Arc<Interface>> {
        self.get(name).ok_or_else(|| Error::UnknownInterface(name.to_owned()))
    }

    pub fn len(&self) -> usize {
        self.interfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interfaces.is_empty()
    }
}

impl FromIterator<Interface> for Catalog {
    fn from_iter<I: IntoIterator<Item=Interface>>(iter: I) -> Self {
        let interfaces = iter.into_iter()
            .map(|i| (i.name.clone(), Arc::new(i)))
            .collect();
        Catalog{interfaces: Arc::new(interfaces)}
    }
}
