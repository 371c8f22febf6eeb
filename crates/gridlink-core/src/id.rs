use slotmap::new_key_type;

new_key_type! {
    /// Identifies a device (generator, consumer, or transmitter) in the registry.
    ///
    /// Keys are generational: a key held after its device is despawned never
    /// resolves to a device spawned later into the same slot.
    pub struct DeviceId;
}
