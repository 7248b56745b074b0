//! Vulkan instance creation and physical device selection.

use std::ffi::{CStr, CString};

use ash::vk;
use raw_window_handle::RawDisplayHandle;

use crate::error::{GpuError, Result};

/// Validation layers to enable in debug builds.
pub fn validation_layers() -> Vec<&'static CStr> {
    vec![c"VK_LAYER_KHRONOS_validation"]
}

/// Required device extensions.
pub fn required_device_extensions() -> Vec<&'static CStr> {
    vec![ash::khr::swapchain::NAME]
}

/// Create a Vulkan instance with the surface extensions the display needs.
///
/// # Safety
/// The entry must be a valid Vulkan entry point and the display handle must
/// be valid.
pub unsafe fn create_instance(
    entry: &ash::Entry,
    app_name: &str,
    display: RawDisplayHandle,
    enable_validation: bool,
) -> Result<ash::Instance> {
    let app_name = CString::new(app_name).unwrap();
    let engine_name = CString::new("Ember").unwrap();

    let app_info = vk::ApplicationInfo::default()
        .application_name(&app_name)
        .application_version(vk::make_api_version(0, 0, 1, 0))
        .engine_name(&engine_name)
        .engine_version(vk::make_api_version(0, 0, 1, 0))
        .api_version(vk::API_VERSION_1_1);

    let extension_names = ash_window::enumerate_required_extensions(display)
        .map_err(|e| GpuError::SurfaceCreation(format!("Unsupported display: {e}")))?
        .to_vec();

    let layers = if enable_validation {
        validation_layers()
    } else {
        vec![]
    };

    // Warn rather than fail when a requested layer is missing; the loader
    // ignores unknown layers only if we drop them ourselves.
    let available_layers = unsafe { entry.enumerate_instance_layer_properties()? };
    let layers: Vec<&CStr> = layers
        .into_iter()
        .filter(|layer| {
            let found = available_layers.iter().any(|props| {
                let name = unsafe { CStr::from_ptr(props.layer_name.as_ptr()) };
                name == *layer
            });
            if !found {
                tracing::warn!("Validation layer {:?} not available", layer);
            }
            found
        })
        .collect();

    let layer_names: Vec<*const i8> = layers.iter().map(|l| l.as_ptr()).collect();

    let create_info = vk::InstanceCreateInfo::default()
        .application_info(&app_info)
        .enabled_extension_names(&extension_names)
        .enabled_layer_names(&layer_names);

    let instance = unsafe { entry.create_instance(&create_info, None)? };

    Ok(instance)
}

/// Queue family indices for rendering and presentation.
#[derive(Debug, Clone, Copy)]
pub struct QueueFamilies {
    pub graphics: u32,
    pub present: u32,
}

impl QueueFamilies {
    /// Whether graphics and present live on the same family.
    pub const fn unified(&self) -> bool {
        self.graphics == self.present
    }
}

/// Find a graphics queue family and a family able to present to `surface`.
///
/// # Safety
/// All handles must be valid.
pub unsafe fn find_queue_families(
    instance: &ash::Instance,
    physical_device: vk::PhysicalDevice,
    surface_loader: &ash::khr::surface::Instance,
    surface: vk::SurfaceKHR,
) -> Result<Option<QueueFamilies>> {
    let families =
        unsafe { instance.get_physical_device_queue_family_properties(physical_device) };

    let mut graphics = None;
    let mut present = None;

    for (i, family) in families.iter().enumerate() {
        let i = i as u32;

        if family.queue_flags.contains(vk::QueueFlags::GRAPHICS) && graphics.is_none() {
            graphics = Some(i);
        }

        let supports_present = unsafe {
            surface_loader.get_physical_device_surface_support(physical_device, i, surface)?
        };
        if supports_present && present.is_none() {
            present = Some(i);
        }

        if let (Some(graphics), Some(present)) = (graphics, present) {
            return Ok(Some(QueueFamilies { graphics, present }));
        }
    }

    Ok(None)
}

/// Select the best physical device that can render to `surface`.
///
/// # Safety
/// All handles must be valid.
pub unsafe fn select_physical_device(
    instance: &ash::Instance,
    surface_loader: &ash::khr::surface::Instance,
    surface: vk::SurfaceKHR,
) -> Result<(vk::PhysicalDevice, QueueFamilies)> {
    let devices = unsafe { instance.enumerate_physical_devices()? };

    if devices.is_empty() {
        return Err(GpuError::NoSuitableDevice);
    }

    let mut best: Option<(vk::PhysicalDevice, QueueFamilies)> = None;
    let mut best_score = 0i32;

    for device in devices {
        let Some(families) =
            (unsafe { find_queue_families(instance, device, surface_loader, surface)? })
        else {
            continue;
        };

        if !unsafe { supports_device_extensions(instance, device)? } {
            continue;
        }

        // A device with no formats or present modes for this surface cannot
        // host a swapchain.
        let formats = unsafe {
            surface_loader.get_physical_device_surface_formats(device, surface)?
        };
        let present_modes = unsafe {
            surface_loader.get_physical_device_surface_present_modes(device, surface)?
        };
        if formats.is_empty() || present_modes.is_empty() {
            continue;
        }

        let score = unsafe { score_physical_device(instance, device) };
        if score > best_score {
            best_score = score;
            best = Some((device, families));
        }
    }

    best.ok_or(GpuError::NoSuitableDevice)
}

/// Check that all required device extensions are available.
///
/// # Safety
/// The instance and physical device must be valid.
unsafe fn supports_device_extensions(
    instance: &ash::Instance,
    device: vk::PhysicalDevice,
) -> Result<bool> {
    let available = unsafe { instance.enumerate_device_extension_properties(device)? };

    Ok(required_device_extensions().iter().all(|required| {
        available.iter().any(|props| {
            let name = unsafe { CStr::from_ptr(props.extension_name.as_ptr()) };
            name == *required
        })
    }))
}

/// Score a physical device for selection.
unsafe fn score_physical_device(instance: &ash::Instance, device: vk::PhysicalDevice) -> i32 {
    let properties = unsafe { instance.get_physical_device_properties(device) };

    let mut score = 1;

    // Prefer discrete GPUs
    match properties.device_type {
        vk::PhysicalDeviceType::DISCRETE_GPU => score += 1000,
        vk::PhysicalDeviceType::INTEGRATED_GPU => score += 100,
        vk::PhysicalDeviceType::VIRTUAL_GPU => score += 50,
        _ => {}
    }

    // Prefer more VRAM
    let memory = unsafe { instance.get_physical_device_memory_properties(device) };
    let vram_mb: u64 = memory
        .memory_heaps
        .iter()
        .take(memory.memory_heap_count as usize)
        .filter(|h| h.flags.contains(vk::MemoryHeapFlags::DEVICE_LOCAL))
        .map(|h| h.size / (1024 * 1024))
        .sum();
    score += (vram_mb / 1024) as i32; // +1 per GB

    score
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unified_queue_families() {
        assert!(QueueFamilies { graphics: 0, present: 0 }.unified());
        assert!(!QueueFamilies { graphics: 0, present: 1 }.unified());
    }

    #[test]
    fn swapchain_extension_is_required() {
        assert!(required_device_extensions().contains(&ash::khr::swapchain::NAME));
    }
}
