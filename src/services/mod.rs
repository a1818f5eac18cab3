pub mod vm_list;

pub use vm_list::VmListService;
