// vim: tw=80
//! Stored-value properties, and stubbing a whole interface from the catalog.

use understudy::*;

fn get(mock: &Mock, name: &str, ty: ValueType) -> Value {
    mock.dispatch(&Accessor::Get.signature(name), &[], ty)
        .unwrap()
        .into_value()
        .unwrap()
}

fn set(mock: &Mock, name: &str, v: Value) {
    let r = mock.dispatch(&Accessor::Set.signature(name), &[v],
                          ResultKind::None);
    assert_eq!(DispatchOutcome::NoValue, r.unwrap());
}

fn catalog() -> Catalog {
    [
        Interface::new("IOrder")
            .with_property("Id", ValueType::Int)
            .with_property("Note", ValueType::Str)
            .with_property("Customer", ValueType::interface("ICustomer")),
        Interface::new("ICustomer")
            .with_property("Name", ValueType::Str)
            .with_property("LastOrder", ValueType::interface("IOrder")),
    ].into_iter().collect()
}

#[test]
fn setup_property() {
    let mock = Mock::new("IOrder");
    mock.setup_property("Id", 1);
    assert_eq!(Value::Int(1), get(&mock, "Id", ValueType::Int));
    set(&mock, "Id", 2.into());
    assert_eq!(Value::Int(2), get(&mock, "Id", ValueType::Int));
}

#[test]
fn accesses_are_recorded() {
    let mock = Mock::new("IOrder");
    mock.setup_property("Id", 1);
    set(&mock, "Id", 5.into());
    get(&mock, "Id", ValueType::Int);
    get(&mock, "Id", ValueType::Int);
    mock.verify_set("Id", ArgumentSpec::eq(5), Times::once()).unwrap();
    mock.verify_get("Id", Times::exactly(2)).unwrap();
}

#[test]
fn untracked_property() {
    let mock = Mock::new("IOrder");
    set(&mock, "Id", 5.into());
    assert_eq!(Value::Int(0), get(&mock, "Id", ValueType::Int));
}

#[test]
fn strict_tracked_property() {
    let mock = Mock::builder("IOrder").behavior(Behavior::Strict).build();
    mock.setup_property("Id", 1);
    set(&mock, "Id", 3.into());
    assert_eq!(Value::Int(3), get(&mock, "Id", ValueType::Int));
}

#[test]
fn explicit_setup_wins() {
    let mock = Mock::new("IOrder");
    mock.setup_property("Id", 1);
    mock.setup_get("Id").returns(99);
    assert_eq!(Value::Int(99), get(&mock, "Id", ValueType::Int));
}

#[test]
fn explicit_setter_setup_wins() {
    let mock = Mock::new("IOrder");
    mock.setup_property("Id", 1);
    mock.setup_set("Id", ArgumentSpec::eq(-1)).verifiable();
    set(&mock, "Id", (-1).into());
    assert_eq!(Value::Int(1), get(&mock, "Id", ValueType::Int));
    set(&mock, "Id", 4.into());
    assert_eq!(Value::Int(4), get(&mock, "Id", ValueType::Int));
    mock.verify_all().unwrap();
}

mod all_properties {
    use super::*;

    #[test]
    fn unknown_interface() {
        let mock = Mock::new("IOrder");
        let e = mock.setup_all_properties().unwrap_err();
        assert!(matches!(e, Error::UnknownInterface(ref n) if n == "IOrder"));
    }

    #[test]
    fn defaults() {
        let mock = Mock::builder("IOrder")
            .catalog(catalog())
            .default_value(DefaultValue::Empty)
            .build();
        mock.setup_all_properties().unwrap();
        assert_eq!(Value::Int(0), get(&mock, "Id", ValueType::Int));
        assert_eq!(Value::from(""), get(&mock, "Note", ValueType::Str));
        assert_eq!(Value::Null,
            get(&mock, "Customer", ValueType::interface("ICustomer")));
        set(&mock, "Note", "rush".into());
        assert_eq!(Value::from("rush"), get(&mock, "Note", ValueType::Str));
    }

    #[test]
    fn nested_mocks_are_stubbed() {
        let order = Mock::builder("IOrder")
            .catalog(catalog())
            .default_value(DefaultValue::Mock)
            .build();
        order.setup_all_properties().unwrap();
        let customer = get(&order, "Customer",
                           ValueType::interface("ICustomer"));
        let customer = customer.as_mock().unwrap();
        set(customer, "Name", "Ada".into());
        assert_eq!(Value::from("Ada"), get(customer, "Name", ValueType::Str));
    }

    /// IOrder -> ICustomer -> IOrder must terminate, and still hand out a
    /// mock once the cyclic property is read.
    #[test]
    fn cycle() {
        let order = Mock::builder("IOrder")
            .catalog(catalog())
            .default_value(DefaultValue::Mock)
            .build();
        order.setup_all_properties().unwrap();
        let customer = get(&order, "Customer",
                           ValueType::interface("ICustomer"));
        let customer = customer.as_mock().unwrap();
        let ty = ValueType::interface("IOrder");
        let last = get(customer, "LastOrder", ty.clone());
        assert_eq!("IOrder", last.as_mock().unwrap().interface_name());
        // Materialized only once
        assert_eq!(last, get(customer, "LastOrder", ty));
    }

    /// A value stored while the cyclic property's mock is being built
    /// is not overwritten by that mock.
    #[test]
    fn cycle_set_during_creation() {
        let factory = |parent: &Mock, interface: &str, member: &str|
            -> Result<Mock>
        {
            if member == "get_LastOrder" {
                let p = parent.clone();
                std::thread::spawn(move || {
                    p.dispatch("set_LastOrder", &["assigned".into()],
                               ResultKind::None)
                }).join().unwrap()?;
            }
            Ok(parent.child_builder(interface).build())
        };
        let order = Mock::builder("IOrder")
            .catalog(catalog())
            .default_value(DefaultValue::Mock)
            .factory(std::sync::Arc::new(factory))
            .build();
        order.setup_all_properties().unwrap();
        let customer = get(&order, "Customer",
                           ValueType::interface("ICustomer"));
        let customer = customer.as_mock().unwrap();
        let ty = ValueType::interface("IOrder");
        assert_eq!(Value::from("assigned"),
                   get(customer, "LastOrder", ty.clone()));
        assert_eq!(Value::from("assigned"), get(customer, "LastOrder", ty));
    }

    #[test]
    fn setter_replaces_nested_mock() {
        let order = Mock::builder("IOrder")
            .catalog(catalog())
            .default_value(DefaultValue::Mock)
            .build();
        order.setup_all_properties().unwrap();
        set(&order, "Customer", Value::Null);
        assert_eq!(Value::Null,
            get(&order, "Customer", ValueType::interface("ICustomer")));
    }
}
