use super::*;
use pith_ir::StringInterner;

#[test]
fn test_attribute_set_then_get() {
    let interner = StringInterner::new();
    let b = interner.intern("b");
    let attrs = AttributeMap::new();

    assert!(!attrs.contains(b));
    attrs.set(b, Value::Int(1));
    assert!(attrs.contains(b));
    assert_eq!(attrs.get(b), Some(Value::Int(1)));
}

#[test]
fn test_attribute_overwrite() {
    let interner = StringInterner::new();
    let b = interner.intern("b");
    let attrs = AttributeMap::new();
    attrs.set(b, Value::Int(1));
    attrs.set(b, Value::string("two"));
    assert_eq!(attrs.get(b), Some(Value::string("two")));
    assert_eq!(attrs.len(), 1);
}

#[test]
fn test_attribute_remove() {
    let interner = StringInterner::new();
    let b = interner.intern("b");
    let attrs = AttributeMap::new();
    attrs.set(b, Value::Int(1));
    assert_eq!(attrs.remove(b), Some(Value::Int(1)));
    assert!(attrs.is_empty());
    assert_eq!(attrs.remove(b), None);
}

#[test]
fn test_mapping_keys_compare_by_value() {
    let mapping = Mapping::default();
    mapping.insert(Value::string("1"), Value::Int(3));
    mapping.insert(Value::Int(4), Value::None);

    assert_eq!(mapping.get(&Value::string("1")), Some(Value::Int(3)));
    assert_eq!(mapping.get(&Value::Int(4)), Some(Value::None));
    // The string key '1' is not the int key 1.
    assert_eq!(mapping.get(&Value::Int(1)), None);
}

#[test]
fn test_mapping_overwrite_keeps_position() {
    let mapping = Mapping::default();
    mapping.insert(Value::Int(1), Value::Int(2));
    mapping.insert(Value::Int(3), Value::Int(4));
    mapping.insert(Value::Int(1), Value::Int(20));

    let keys: Vec<_> = mapping.entries().into_iter().map(|(k, _)| k).collect();
    assert_eq!(keys, vec![Value::Int(1), Value::Int(3)]);
    assert_eq!(mapping.get(&Value::Int(1)), Some(Value::Int(20)));
}

#[test]
fn test_mapping_remove() {
    let mapping = Mapping::default();
    mapping.insert(Value::Int(1), Value::Int(2));
    assert!(mapping.contains(&Value::Int(1)));
    assert_eq!(mapping.remove(&Value::Int(1)), Some(Value::Int(2)));
    assert!(mapping.is_empty());
}

#[test]
fn test_list_payload() {
    let obj = Object::new(TypeId::LIST, ObjectPayload::list(vec![Value::Int(1)]));
    assert!(obj.list_push(Value::Int(2)));
    assert_eq!(obj.list_get(1), Some(Value::Int(2)));
    assert_eq!(obj.len(), Some(2));
    assert_eq!(obj.list_snapshot(), Some(vec![Value::Int(1), Value::Int(2)]));
}

#[test]
fn test_instance_has_no_len() {
    let obj = Object::new(TypeId::OBJECT, ObjectPayload::Instance);
    assert_eq!(obj.len(), None);
    assert!(!obj.list_push(Value::None));
    assert!(obj.mapping().is_none());
}
