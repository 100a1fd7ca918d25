use crate::attributes::CallbackPoint;
use crate::cache::ReflectionMap;
use crate::error::MapError;
use crate::reflect::Reflect;

/// Runs the callbacks of `point` on `target`, in declaration order.
///
/// Stops at the first failing callback.
pub(crate) fn invoke(
    map: &ReflectionMap,
    point: CallbackPoint,
    target: &mut dyn Reflect,
) -> Result<(), MapError> {
    for callback in map.callbacks(point) {
        log::trace!("running {point} callback of `{}`", map.type_path());
        callback.invoke(target)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::invoke;
    use crate::MapError;
    use crate::attributes::CallbackPoint;
    use crate::cache::ReflectionCache;
    use crate::definition::SerializationDefinition;
    use crate::fixtures::{Entry, Journal};

    #[test]
    fn runs_in_declaration_order() {
        let cache = ReflectionCache::new(SerializationDefinition::standard());
        let map = cache.get_of::<Journal>().unwrap();

        let mut journal = Journal::default();
        invoke(&map, CallbackPoint::PostDeserialize, &mut journal).unwrap();
        assert_eq!(journal.log, ["first", "second"]);

        invoke(&map, CallbackPoint::PreSerialize, &mut journal).unwrap();
        assert_eq!(journal.log, ["first", "second", "save"]);
    }

    #[test]
    fn failure_stops_and_propagates() {
        let cache = ReflectionCache::new(SerializationDefinition::standard());
        let map = cache.get_of::<Journal>().unwrap();

        let mut journal = Journal {
            fail: true,
            ..Journal::default()
        };
        let error = invoke(&map, CallbackPoint::PostDeserialize, &mut journal).unwrap_err();
        assert!(matches!(error, MapError::Callback(_)));
        assert_eq!(error.to_string(), "journal is sealed");
        assert_eq!(journal.log, ["first"]);
    }

    #[test]
    fn wrong_target_is_a_mismatch() {
        let cache = ReflectionCache::new(SerializationDefinition::standard());
        let map = cache.get_of::<Journal>().unwrap();

        let error = invoke(&map, CallbackPoint::PreSerialize, &mut Entry::default()).unwrap_err();
        assert!(matches!(error, MapError::TypeMismatch { .. }));
    }

    #[test]
    fn unrecognised_callbacks_do_not_run() {
        let cache = ReflectionCache::new(SerializationDefinition::builder("none").build());
        let map = cache.get_of::<Journal>().unwrap();

        let mut journal = Journal::default();
        invoke(&map, CallbackPoint::PostDeserialize, &mut journal).unwrap();
        assert!(journal.log.is_empty());
    }
}
