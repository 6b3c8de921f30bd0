//! Per-slot controller handle

use tracing::warn;
use wand_core::{ControllerId, ControllerSample};
use wand_hid::{DeviceDescriptor, ReadResult, Transport};

/// One pre-allocated slot occupant wrapping a potential device.
///
/// All handles are created when the manager is built and live until
/// shutdown; only their open/closed state and device-path binding change
/// over the process lifetime.
#[derive(Debug)]
pub struct ControllerHandle<D> {
    id: ControllerId,
    path: Option<String>,
    device: Option<D>,
    sample: ControllerSample,
}

impl<D> ControllerHandle<D> {
    pub fn new(id: ControllerId) -> Self {
        Self {
            id,
            path: None,
            device: None,
            sample: ControllerSample::default(),
        }
    }

    pub fn id(&self) -> ControllerId {
        self.id
    }

    pub fn set_id(&mut self, id: ControllerId) {
        self.id = id;
    }

    pub fn is_open(&self) -> bool {
        self.device.is_some()
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Latest sample, updated in place by [`ControllerHandle::read`]
    pub fn sample(&self) -> &ControllerSample {
        &self.sample
    }

    /// Path equality against a descriptor. Closed handles never match, so
    /// a stale binding cannot capture a reconnecting device.
    pub fn matches(&self, descriptor: &DeviceDescriptor) -> bool {
        self.is_open() && self.path.as_deref() == Some(descriptor.path.as_str())
    }

    /// Bind this handle to a descriptor and try to open the device.
    ///
    /// On failure the handle stays closed but keeps the path binding, so
    /// its slot still reserves the device for this pass; the open is
    /// retried on a later reconciliation pass.
    pub fn open<T: Transport<Device = D>>(
        &mut self,
        transport: &mut T,
        descriptor: &DeviceDescriptor,
    ) -> bool {
        if self.device.is_some() {
            self.close(transport);
        }
        self.path = Some(descriptor.path.clone());

        match transport.open(descriptor) {
            Ok(device) => {
                self.device = Some(device);
                true
            }
            Err(e) => {
                warn!(controller = %self.id, error = %e, "Failed to open controller");
                false
            }
        }
    }

    /// Idempotent. Clears both the device and the path binding, leaving
    /// the handle fungible for future new devices.
    pub fn close<T: Transport<Device = D>>(&mut self, transport: &mut T) {
        if let Some(device) = self.device.take() {
            transport.close(device);
        }
        self.path = None;
    }

    /// Non-blocking read; a new sample replaces the stored one in place.
    /// Closed handles report `NoData`.
    pub fn read<T: Transport<Device = D>>(&mut self, transport: &mut T) -> ReadResult {
        match self.device.as_mut() {
            Some(device) => {
                let result = transport.read(device);
                if let ReadResult::NewData(sample) = result {
                    self.sample = sample;
                }
                result
            }
            None => ReadResult::NoData,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use wand_hid::HidError;

    /// Transport stub whose devices are just their path
    #[derive(Default)]
    struct StubTransport {
        refuse_open: bool,
        reads: VecDeque<ReadResult>,
        closed: Vec<String>,
    }

    impl Transport for StubTransport {
        type Device = String;

        fn initialize(&mut self) -> Result<(), HidError> {
            Ok(())
        }

        fn shutdown(&mut self) {}

        fn enumerate(&mut self) -> Result<Vec<DeviceDescriptor>, HidError> {
            Ok(Vec::new())
        }

        fn open(&mut self, descriptor: &DeviceDescriptor) -> Result<String, HidError> {
            if self.refuse_open {
                return Err(HidError::Open {
                    path: descriptor.path.clone(),
                    reason: "refused".into(),
                });
            }
            Ok(descriptor.path.clone())
        }

        fn close(&mut self, device: String) {
            self.closed.push(device);
        }

        fn read(&mut self, _device: &mut String) -> ReadResult {
            self.reads.pop_front().unwrap_or(ReadResult::NoData)
        }
    }

    fn descriptor(path: &str) -> DeviceDescriptor {
        DeviceDescriptor {
            path: path.to_string(),
            vendor_id: 0x054c,
            product_id: 0x03d5,
            serial: None,
        }
    }

    #[test]
    fn test_open_binds_path_and_matches() {
        let mut transport = StubTransport::default();
        let mut handle = ControllerHandle::new(ControllerId(0));

        assert!(handle.open(&mut transport, &descriptor("usb:1")));
        assert!(handle.is_open());
        assert_eq!(handle.path(), Some("usb:1"));
        assert!(handle.matches(&descriptor("usb:1")));
        assert!(!handle.matches(&descriptor("usb:2")));
    }

    #[test]
    fn test_failed_open_keeps_path_but_never_matches() {
        let mut transport = StubTransport {
            refuse_open: true,
            ..Default::default()
        };
        let mut handle = ControllerHandle::new(ControllerId(0));

        assert!(!handle.open(&mut transport, &descriptor("usb:1")));
        assert!(!handle.is_open());
        assert_eq!(handle.path(), Some("usb:1"));
        assert!(!handle.matches(&descriptor("usb:1")));
    }

    #[test]
    fn test_close_is_idempotent_and_clears_binding() {
        let mut transport = StubTransport::default();
        let mut handle = ControllerHandle::new(ControllerId(0));
        handle.open(&mut transport, &descriptor("usb:1"));

        handle.close(&mut transport);
        assert!(!handle.is_open());
        assert_eq!(handle.path(), None);

        handle.close(&mut transport);
        assert_eq!(transport.closed, vec!["usb:1".to_string()]);
    }

    #[test]
    fn test_read_updates_sample_in_place() {
        let mut transport = StubTransport::default();
        let mut sample = ControllerSample::default();
        sample.trigger = 0.75;
        transport.reads.push_back(ReadResult::NewData(sample));

        let mut handle = ControllerHandle::new(ControllerId(0));
        handle.open(&mut transport, &descriptor("usb:1"));

        assert_eq!(handle.read(&mut transport), ReadResult::NewData(sample));
        assert_eq!(handle.sample().trigger, 0.75);

        // Queue exhausted, sample keeps the last value
        assert_eq!(handle.read(&mut transport), ReadResult::NoData);
        assert_eq!(handle.sample().trigger, 0.75);
    }

    #[test]
    fn test_read_on_closed_handle_reports_no_data() {
        let mut transport = StubTransport::default();
        transport.reads.push_back(ReadResult::Failure);

        let mut handle: ControllerHandle<String> = ControllerHandle::new(ControllerId(0));
        assert_eq!(handle.read(&mut transport), ReadResult::NoData);
    }
}
