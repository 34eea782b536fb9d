use super::*;
use slotmap::SlotMap;

fn ids() -> (NodeId, HandlerId, HandlerId) {
    let mut nodes: SlotMap<NodeId, ()> = SlotMap::with_key();
    let mut handlers: SlotMap<HandlerId, ()> = SlotMap::with_key();
    (nodes.insert(()), handlers.insert(()), handlers.insert(()))
}

#[test]
fn event_kind_parses_known_names_only() {
    assert_eq!("click".parse::<EventKind>().unwrap(), EventKind::Click);
    assert_eq!("clickOver".parse::<EventKind>().unwrap(), EventKind::ClickOver);
    assert!(matches!(
        "hover".parse::<EventKind>(),
        Err(StrataError::UnknownEvent(name)) if name == "hover"
    ));
    assert_eq!(EventKind::ClickOver.to_string(), "clickOver");
}

#[test]
fn registration_needs_click_handling() {
    let (node, handler, _) = ids();
    let mut off = SurfaceBinding::new(false);
    assert!(matches!(
        off.on(EventKind::Click, Target { node, handler }),
        Err(StrataError::Unsupported(_))
    ));
    assert!(matches!(
        off.off(EventKind::Click, handler),
        Err(StrataError::Unsupported(_))
    ));
}

#[test]
fn push_marks_out_of_order_and_off_removes() {
    let (node, h1, h2) = ids();
    let mut binding = SurfaceBinding::new(true);
    binding.list_mut(EventKind::Click).in_order = true;
    binding.on(EventKind::Click, Target { node, handler: h1 }).unwrap();
    binding.on(EventKind::Click, Target { node, handler: h2 }).unwrap();
    assert!(!binding.is_in_order(EventKind::Click));
    assert_eq!(binding.targets(EventKind::Click).len(), 2);
    assert!(binding.targets(EventKind::ClickOver).is_empty());

    assert!(binding.off(EventKind::Click, h1).unwrap());
    assert!(!binding.off(EventKind::Click, h1).unwrap());
    assert_eq!(
        binding.targets(EventKind::Click),
        &[Target { node, handler: h2 }]
    );

    binding.forget_node(node);
    assert!(binding.targets(EventKind::Click).is_empty());
}
