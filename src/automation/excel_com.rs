//! Excel COM automation host (Windows only).
//!
//! Late-bound `IDispatch` automation against `Excel.Application`: the
//! instance is made visible, alerts are suppressed for the duration of
//! the session, and modules are managed through the workbook's VBProject
//! object model. Requires "Trust access to the VBA project object model"
//! to be enabled in Excel's macro settings.

use super::{AutomationHost, WorkbookSession};
use crate::error::{KitError, KitResult};
use std::path::Path;
use windows::core::{w, BSTR, GUID, PCWSTR, VARIANT};
use windows::Win32::System::Com::{
    CLSIDFromProgID, CoCreateInstance, CoInitializeEx, CoUninitialize, IDispatch,
    CLSCTX_LOCAL_SERVER, COINIT_APARTMENTTHREADED, DISPATCH_FLAGS, DISPATCH_METHOD,
    DISPATCH_PROPERTYGET, DISPATCH_PROPERTYPUT, DISPPARAMS,
};

const LOCALE_USER_DEFAULT: u32 = 0x0400;
const DISPID_PROPERTYPUT: i32 = -3;

/// Balances `CoInitializeEx` with `CoUninitialize`, including on the
/// error paths out of `open` before a session exists.
struct ComGuard;

impl ComGuard {
    fn init() -> KitResult<Self> {
        unsafe {
            CoInitializeEx(None, COINIT_APARTMENTTHREADED)
                .ok()
                .map_err(|e| KitError::Automation(format!("COM init failed: {}", e)))?;
        }
        Ok(Self)
    }
}

impl Drop for ComGuard {
    fn drop(&mut self) {
        unsafe { CoUninitialize() }
    }
}

#[derive(Debug, Default)]
pub struct ExcelHost;

impl ExcelHost {
    pub fn new() -> Self {
        Self
    }
}

impl AutomationHost for ExcelHost {
    fn open(&self, workbook: &Path) -> KitResult<Box<dyn WorkbookSession>> {
        let absolute = workbook.canonicalize()?;
        let com = ComGuard::init()?;

        unsafe {
            let clsid = CLSIDFromProgID(w!("Excel.Application"))
                .map_err(|e| KitError::Automation(format!("Excel not registered: {}", e)))?;
            let app: IDispatch = CoCreateInstance(&clsid, None, CLSCTX_LOCAL_SERVER)
                .map_err(|e| KitError::Automation(format!("cannot start Excel: {}", e)))?;

            put(&app, "Visible", VARIANT::from(true))?;
            put(&app, "DisplayAlerts", VARIANT::from(false))?;

            let workbooks = get_object(&app, "Workbooks")?;
            let path_arg = VARIANT::from(BSTR::from(absolute.to_string_lossy().as_ref()));
            let wb = invoke(&workbooks, "Open", DISPATCH_METHOD, vec![path_arg])?;
            let workbook = to_dispatch(&wb, "Workbooks.Open")?;
            let vbproject = get_object(&workbook, "VBProject")?;

            Ok(Box::new(ExcelSession {
                app,
                workbook,
                vbproject,
                _com: com,
            }))
        }
    }
}

struct ExcelSession {
    app: IDispatch,
    workbook: IDispatch,
    vbproject: IDispatch,
    // Declared last: the dispatch interfaces release before the
    // apartment is torn down.
    _com: ComGuard,
}

impl ExcelSession {
    unsafe fn components(&self) -> KitResult<IDispatch> {
        get_object(&self.vbproject, "VBComponents")
    }

    /// Find a component by exact name, returning its dispatch interface.
    unsafe fn find_component(&self, name: &str) -> KitResult<Option<IDispatch>> {
        let components = self.components()?;
        let count =
            i32::try_from(&invoke(&components, "Count", DISPATCH_PROPERTYGET, vec![])?)
                .map_err(|e| KitError::Automation(format!("VBComponents.Count: {}", e)))?;

        // COM collections are 1-based.
        for index in 1..=count {
            let item = invoke(
                &components,
                "Item",
                DISPATCH_PROPERTYGET,
                vec![VARIANT::from(index)],
            )?;
            let item = to_dispatch(&item, "VBComponents.Item")?;
            let item_name =
                BSTR::try_from(&invoke(&item, "Name", DISPATCH_PROPERTYGET, vec![])?)
                    .map_err(|e| KitError::Automation(format!("VBComponent.Name: {}", e)))?;
            if item_name.to_string() == name {
                return Ok(Some(item));
            }
        }
        Ok(None)
    }
}

impl WorkbookSession for ExcelSession {
    fn component_names(&mut self) -> KitResult<Vec<String>> {
        unsafe {
            let components = self.components()?;
            let count =
                i32::try_from(&invoke(&components, "Count", DISPATCH_PROPERTYGET, vec![])?)
                    .map_err(|e| KitError::Automation(format!("VBComponents.Count: {}", e)))?;

            let mut names = Vec::with_capacity(count as usize);
            for index in 1..=count {
                let item = invoke(
                    &components,
                    "Item",
                    DISPATCH_PROPERTYGET,
                    vec![VARIANT::from(index)],
                )?;
                let item = to_dispatch(&item, "VBComponents.Item")?;
                let name =
                    BSTR::try_from(&invoke(&item, "Name", DISPATCH_PROPERTYGET, vec![])?)
                        .map_err(|e| {
                            KitError::Automation(format!("VBComponent.Name: {}", e))
                        })?;
                names.push(name.to_string());
            }
            Ok(names)
        }
    }

    fn remove_component(&mut self, name: &str) -> KitResult<()> {
        unsafe {
            let component = self.find_component(name)?.ok_or_else(|| {
                KitError::Automation(format!("no component named {}", name))
            })?;
            let components = self.components()?;
            invoke(
                &components,
                "Remove",
                DISPATCH_METHOD,
                vec![VARIANT::from(component)],
            )?;
            Ok(())
        }
    }

    fn import_component(&mut self, path: &Path) -> KitResult<()> {
        let absolute = path.canonicalize()?;
        unsafe {
            let components = self.components()?;
            let path_arg = VARIANT::from(BSTR::from(absolute.to_string_lossy().as_ref()));
            invoke(&components, "Import", DISPATCH_METHOD, vec![path_arg])?;
            Ok(())
        }
    }

    fn save(&mut self) -> KitResult<()> {
        unsafe {
            invoke(&self.workbook, "Save", DISPATCH_METHOD, vec![])?;
            Ok(())
        }
    }
}

impl Drop for ExcelSession {
    fn drop(&mut self) {
        unsafe {
            // Restore alerts; the user keeps the visible Excel instance.
            let _ = put(&self.app, "DisplayAlerts", VARIANT::from(true));
        }
    }
}

/// Late-bound property put.
unsafe fn put(dispatch: &IDispatch, member: &str, value: VARIANT) -> KitResult<()> {
    invoke(dispatch, member, DISPATCH_PROPERTYPUT, vec![value])?;
    Ok(())
}

/// Late-bound property get that must yield an object.
unsafe fn get_object(dispatch: &IDispatch, member: &str) -> KitResult<IDispatch> {
    let result = invoke(dispatch, member, DISPATCH_PROPERTYGET, vec![])?;
    to_dispatch(&result, member)
}

fn to_dispatch(value: &VARIANT, context: &str) -> KitResult<IDispatch> {
    IDispatch::try_from(value)
        .map_err(|e| KitError::Automation(format!("{} did not return an object: {}", context, e)))
}

/// Resolve `member` to a DISPID and invoke it with `args`.
unsafe fn invoke(
    dispatch: &IDispatch,
    member: &str,
    flags: DISPATCH_FLAGS,
    mut args: Vec<VARIANT>,
) -> KitResult<VARIANT> {
    let wide: Vec<u16> = member.encode_utf16().chain(std::iter::once(0)).collect();
    let name = PCWSTR(wide.as_ptr());
    let mut dispid = 0i32;
    dispatch
        .GetIDsOfNames(&GUID::zeroed(), &name, 1, LOCALE_USER_DEFAULT, &mut dispid)
        .map_err(|e| KitError::Automation(format!("{}: {}", member, e)))?;

    // Dispatch arguments are passed in reverse order.
    args.reverse();

    let mut named_arg = DISPID_PROPERTYPUT;
    let mut params = DISPPARAMS {
        // windows::core::VARIANT is layout-compatible with the raw VARIANT.
        rgvarg: args.as_mut_ptr().cast(),
        rgdispidNamedArgs: std::ptr::null_mut(),
        cArgs: args.len() as u32,
        cNamedArgs: 0,
    };
    if flags == DISPATCH_PROPERTYPUT {
        params.rgdispidNamedArgs = &mut named_arg;
        params.cNamedArgs = 1;
    }

    let mut result = VARIANT::default();
    dispatch
        .Invoke(
            dispid,
            &GUID::zeroed(),
            LOCALE_USER_DEFAULT,
            flags,
            &params,
            Some((&mut result as *mut VARIANT).cast()),
            None,
            None,
        )
        .map_err(|e| KitError::Automation(format!("{}: {}", member, e)))?;
    Ok(result)
}
